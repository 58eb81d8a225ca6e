pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod protocol;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{FairwayGame, GameEvent};
    use crate::input::BoardInput;

    /// Press and release the pointer at `(x, y)`, returning all emitted events.
    pub fn drag_to(game: &mut dyn FairwayGame, x: f64, y: f64) -> Vec<GameEvent> {
        let mut events = game.apply_input(&BoardInput::PointerDown { x, y });
        events.extend(game.apply_input(&BoardInput::PointerUp { x, y }));
        events
    }

    /// Run N ticks, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn FairwayGame, n: usize) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update());
        }
        all_events
    }

    /// Tick until the game stops asking for ticks.
    ///
    /// Returns the number of ticks run and the events emitted. Panics if the
    /// game is still ticking after `max_ticks`.
    pub fn run_until_settled(
        game: &mut dyn FairwayGame,
        max_ticks: usize,
    ) -> (usize, Vec<GameEvent>) {
        let mut events = Vec::new();
        for n in 0..max_ticks {
            if !game.is_ticking() {
                return (n, events);
            }
            events.extend(game.update());
        }
        assert!(
            !game.is_ticking(),
            "game still ticking after {max_ticks} ticks"
        );
        (max_ticks, events)
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every FairwayGame implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules.

    /// After init(), serialize_state() must return non-empty bytes and the
    /// game must be at rest.
    pub fn contract_init_is_at_rest(game: &mut dyn FairwayGame) {
        game.init();
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
        assert!(!game.is_ticking(), "a fresh game must not request ticks");
        assert!(!game.is_round_complete(), "a fresh game must not be won");
    }

    /// update() while at rest must not change state.
    pub fn contract_update_at_rest_is_noop(game: &mut dyn FairwayGame) {
        assert!(!game.is_ticking());
        let before = game.serialize_state();
        let events = run_game_ticks(game, 5);
        assert!(events.is_empty(), "idle ticks must not emit events");
        assert_eq!(
            before,
            game.serialize_state(),
            "State must not change while the game is at rest"
        );
    }

    /// A non-degenerate drag must start ticking and the shot must settle
    /// within `max_ticks`; afterwards further ticks change nothing.
    pub fn contract_shot_settles(game: &mut dyn FairwayGame, x: f64, y: f64, max_ticks: usize) {
        drag_to(game, x, y);
        assert!(game.is_ticking(), "a real drag must start ticking");
        let (ticks, _) = run_until_settled(game, max_ticks);
        assert!(ticks > 0, "shot must run at least one tick");

        let settled = game.serialize_state();
        run_game_ticks(game, 10);
        assert_eq!(
            settled,
            game.serialize_state(),
            "State must not change after the shot settles"
        );
    }

    /// A pointer-up with no pointer-down must not change state.
    pub fn contract_stray_pointer_up_ignored(game: &mut dyn FairwayGame) {
        let before = game.serialize_state();
        let events = game.apply_input(&BoardInput::PointerUp { x: 400.0, y: 100.0 });
        assert!(events.is_empty(), "stray pointer-up must not emit events");
        assert!(!game.is_ticking());
        assert_eq!(before, game.serialize_state());
    }
}
