//! The shot state machine.
//!
//! `step` consumes surface input and `tick` advances the simulation; both run
//! on the caller's single task, so neither can observe the other half-done.

use serde::{Deserialize, Serialize};

use fairway_core::game_trait::GameEvent;
use fairway_core::geometry::Vec2;
use fairway_core::input::BoardInput;

use crate::aim::Aim;
use crate::config::GolfConfig;
use crate::course::Course;
use crate::physics::{BallState, TickOutcome};

/// Which phase of a shot the board is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Idle,
    Aiming,
    Moving,
    Won,
}

/// Owns the ball and drives it through Idle → Aiming → Moving → Won/Idle.
#[derive(Debug, Clone)]
pub struct ShotController {
    config: GolfConfig,
    course: Course,
    ball: BallState,
    phase: GamePhase,
    strokes: u32,
}

impl ShotController {
    pub fn new(config: GolfConfig) -> Self {
        let course = Course::from_config(&config);
        Self {
            ball: BallState::new(course.spawn_point),
            phase: GamePhase::Idle,
            strokes: 0,
            config,
            course,
        }
    }

    pub fn config(&self) -> &GolfConfig {
        &self.config
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn position(&self) -> Vec2 {
        self.ball.position
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn strokes(&self) -> u32 {
        self.strokes
    }

    /// Current velocity; `Some` only while the phase is `Moving`.
    pub fn velocity(&self) -> Option<Vec2> {
        self.ball.velocity()
    }

    /// Apply one surface input. Inputs that do not fit the current phase are
    /// ignored without error.
    pub fn step(&mut self, input: &BoardInput) -> Option<GameEvent> {
        match (*input, self.phase) {
            (BoardInput::PointerDown { .. }, GamePhase::Idle) => {
                self.set_phase(GamePhase::Aiming);
                Some(GameEvent::AimStarted)
            },
            (BoardInput::PointerUp { x, y }, GamePhase::Aiming) => {
                let aim = Aim::from_drag(self.ball.position, Vec2::new(x, y), &self.config);
                self.ball.launch(&aim);
                self.strokes += 1;
                self.set_phase(GamePhase::Moving);
                tracing::debug!(
                    angle = aim.angle,
                    power = aim.power,
                    strokes = self.strokes,
                    "Shot taken"
                );
                Some(GameEvent::ShotTaken {
                    angle: aim.angle,
                    power: aim.power,
                })
            },
            (BoardInput::Replay, GamePhase::Won) => {
                self.replay();
                Some(GameEvent::Replayed)
            },
            (input, phase) => {
                tracing::trace!(?input, ?phase, "Ignored input");
                None
            },
        }
    }

    /// Advance one tick. Does nothing unless a shot is in flight.
    ///
    /// The tick that detects the stop also decides the outcome, so the caller
    /// sees the shot end and the win/miss in the same call.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Moving {
            return Vec::new();
        }

        match self.ball.advance(&self.config) {
            TickOutcome::Rolling => Vec::new(),
            TickOutcome::Stopped => {
                let rest = self.ball.position;
                let mut events = vec![GameEvent::BallStopped {
                    x: rest.x,
                    y: rest.y,
                }];
                if self.course.hole.captures(rest) {
                    self.set_phase(GamePhase::Won);
                    tracing::info!(strokes = self.strokes, "Hole won");
                    events.push(GameEvent::HoleWon {
                        strokes: self.strokes,
                    });
                } else {
                    // A miss is silent: the ball just waits for the next shot.
                    self.set_phase(GamePhase::Idle);
                }
                events
            },
            TickOutcome::AtRest => {
                // Moving without a velocity cannot happen through `step`.
                tracing::warn!("Moving phase with no shot in flight, resetting to idle");
                self.set_phase(GamePhase::Idle);
                Vec::new()
            },
        }
    }

    /// Reset the ball to the tee. Only meaningful after a win; elsewhere it
    /// leaves everything untouched.
    pub fn replay(&mut self) -> bool {
        if self.phase != GamePhase::Won {
            return false;
        }
        self.ball.reset(self.course.spawn_point);
        self.strokes = 0;
        self.set_phase(GamePhase::Idle);
        true
    }

    /// Return to the initial state regardless of phase.
    pub fn restart(&mut self) {
        self.ball.reset(self.course.spawn_point);
        self.strokes = 0;
        self.set_phase(GamePhase::Idle);
    }

    fn set_phase(&mut self, next: GamePhase) {
        tracing::debug!(from = ?self.phase, to = ?next, "Phase change");
        self.phase = next;
    }

    #[cfg(test)]
    pub(crate) fn place_ball(&mut self, position: Vec2) {
        self.ball.reset(position);
    }
}

impl Default for ShotController {
    fn default() -> Self {
        Self::new(GolfConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> BoardInput {
        BoardInput::PointerDown { x, y }
    }

    fn up(x: f64, y: f64) -> BoardInput {
        BoardInput::PointerUp { x, y }
    }

    /// Tick until the phase leaves Moving; returns ticks run.
    fn settle(ctl: &mut ShotController) -> usize {
        let mut ticks = 0;
        while ctl.phase() == GamePhase::Moving {
            ctl.tick();
            ticks += 1;
            assert!(ticks < 1000, "shot never settled");
        }
        ticks
    }

    fn shoot_at(ctl: &mut ShotController, x: f64, y: f64) -> usize {
        ctl.step(&down(x, y));
        ctl.step(&up(x, y));
        settle(ctl)
    }

    #[test]
    fn starts_idle_on_tee() {
        let ctl = ShotController::default();
        assert_eq!(ctl.phase(), GamePhase::Idle);
        assert_eq!(ctl.position(), Vec2::new(50.0, 300.0));
        assert_eq!(ctl.velocity(), None);
        assert_eq!(ctl.strokes(), 0);
    }

    #[test]
    fn pointer_down_starts_aiming() {
        let mut ctl = ShotController::default();
        assert_eq!(ctl.step(&down(10.0, 10.0)), Some(GameEvent::AimStarted));
        assert_eq!(ctl.phase(), GamePhase::Aiming);
        assert_eq!(ctl.velocity(), None);
        assert_eq!(ctl.position(), Vec2::new(50.0, 300.0));
    }

    #[test]
    fn pointer_up_launches_from_ball_position() {
        let mut ctl = ShotController::default();
        ctl.step(&down(0.0, 0.0));
        let event = ctl.step(&up(450.0, 300.0));
        assert_eq!(
            event,
            Some(GameEvent::ShotTaken {
                angle: 0.0,
                power: 40.0
            })
        );
        assert_eq!(ctl.phase(), GamePhase::Moving);
        assert_eq!(ctl.velocity(), Some(Vec2::new(40.0, 0.0)));
        assert_eq!(ctl.strokes(), 1);
    }

    #[test]
    fn stray_pointer_up_is_ignored() {
        let mut ctl = ShotController::default();
        assert_eq!(ctl.step(&up(450.0, 300.0)), None);
        assert_eq!(ctl.phase(), GamePhase::Idle);
        assert_eq!(ctl.velocity(), None);
        assert_eq!(ctl.strokes(), 0);
        assert!(ctl.tick().is_empty());
        assert_eq!(ctl.position(), Vec2::new(50.0, 300.0));
    }

    #[test]
    fn input_during_flight_is_ignored() {
        let mut ctl = ShotController::default();
        ctl.step(&down(0.0, 0.0));
        ctl.step(&up(450.0, 300.0));
        ctl.tick();
        let velocity = ctl.velocity();

        assert_eq!(ctl.step(&down(100.0, 100.0)), None);
        assert_eq!(ctl.step(&up(100.0, 100.0)), None);
        assert_eq!(ctl.step(&BoardInput::Replay), None);
        assert_eq!(ctl.phase(), GamePhase::Moving);
        assert_eq!(ctl.velocity(), velocity);
        assert_eq!(ctl.strokes(), 1);
    }

    #[test]
    fn hole_in_one_attempt_rests_short_and_returns_idle() {
        let mut ctl = ShotController::default();
        let ticks = shoot_at(&mut ctl, 450.0, 300.0);
        assert_eq!(ticks, 217);
        assert_eq!(ctl.phase(), GamePhase::Idle);
        assert!((ctl.position().x - 247.5049).abs() < 1e-3);
        assert_eq!(ctl.position().y, 300.0);
        assert_eq!(ctl.velocity(), None);
    }

    #[test]
    fn repeated_shots_at_cup_win_on_fifth() {
        let mut ctl = ShotController::default();
        let mut shots = 0;
        while ctl.phase() != GamePhase::Won {
            shoot_at(&mut ctl, 450.0, 300.0);
            shots += 1;
            assert!(shots <= 5, "expected a win by the fifth shot");
        }
        assert_eq!(shots, 5);
        assert_eq!(ctl.strokes(), 5);
        let dist = ctl.position().distance(Vec2::new(450.0, 300.0));
        assert!(dist < 20.0, "won at distance {dist}");
        assert!((dist - 17.2555).abs() < 1e-3, "dist = {dist}");
    }

    #[test]
    fn winning_tick_reports_stop_then_win() {
        let mut ctl = ShotController::default();
        // Short putt from just outside the cup.
        ctl.place_ball(Vec2::new(440.0, 300.0));
        ctl.step(&down(0.0, 0.0));
        ctl.step(&up(450.0, 300.0));
        let mut last = Vec::new();
        while ctl.phase() == GamePhase::Moving {
            last = ctl.tick();
        }
        assert_eq!(ctl.phase(), GamePhase::Won);
        assert_eq!(last.len(), 2);
        assert!(matches!(last[0], GameEvent::BallStopped { .. }));
        assert_eq!(last[1], GameEvent::HoleWon { strokes: 1 });
    }

    #[test]
    fn zero_length_drag_stops_immediately() {
        let mut ctl = ShotController::default();
        let ticks = shoot_at(&mut ctl, 50.0, 300.0);
        assert_eq!(ticks, 1);
        assert_eq!(ctl.phase(), GamePhase::Idle);
        assert_eq!(ctl.position(), Vec2::new(50.0, 300.0));
        assert_eq!(ctl.strokes(), 1);
    }

    #[test]
    fn resting_exactly_on_rim_is_not_a_win() {
        let mut ctl = ShotController::default();
        ctl.place_ball(Vec2::new(430.0, 300.0));
        // Zero-length drag: the ball stops where it is, 20 from the cup.
        shoot_at(&mut ctl, 430.0, 300.0);
        assert_eq!(ctl.position().distance(Vec2::new(450.0, 300.0)), 20.0);
        assert_eq!(ctl.phase(), GamePhase::Idle);
    }

    #[test]
    fn resting_inside_rim_wins_without_moving() {
        let mut ctl = ShotController::default();
        ctl.place_ball(Vec2::new(431.0, 300.0));
        shoot_at(&mut ctl, 431.0, 300.0);
        assert_eq!(ctl.phase(), GamePhase::Won);
    }

    #[test]
    fn no_motion_after_shot_ends() {
        let mut ctl = ShotController::default();
        shoot_at(&mut ctl, 300.0, 200.0);
        let rest = ctl.position();
        for _ in 0..100 {
            assert!(ctl.tick().is_empty());
        }
        assert_eq!(ctl.position(), rest);
    }

    #[test]
    fn replay_after_win_resets_tee_and_strokes() {
        let mut ctl = ShotController::default();
        ctl.place_ball(Vec2::new(445.0, 300.0));
        shoot_at(&mut ctl, 445.0, 300.0);
        assert_eq!(ctl.phase(), GamePhase::Won);

        assert_eq!(ctl.step(&BoardInput::Replay), Some(GameEvent::Replayed));
        assert_eq!(ctl.phase(), GamePhase::Idle);
        assert_eq!(ctl.position(), Vec2::new(50.0, 300.0));
        assert_eq!(ctl.strokes(), 0);
    }

    #[test]
    fn replay_while_idle_is_idempotent() {
        let mut ctl = ShotController::default();
        shoot_at(&mut ctl, 200.0, 300.0);
        let rest = ctl.position();
        assert_eq!(ctl.phase(), GamePhase::Idle);

        assert!(!ctl.replay());
        assert_eq!(ctl.step(&BoardInput::Replay), None);
        assert_eq!(ctl.phase(), GamePhase::Idle);
        assert_eq!(ctl.position(), rest);
    }

    #[test]
    fn won_board_ignores_pointer_until_replay() {
        let mut ctl = ShotController::default();
        ctl.place_ball(Vec2::new(445.0, 300.0));
        shoot_at(&mut ctl, 445.0, 300.0);
        assert_eq!(ctl.step(&down(0.0, 0.0)), None);
        assert_eq!(ctl.phase(), GamePhase::Won);
    }

    #[test]
    fn restart_clears_any_phase() {
        let mut ctl = ShotController::default();
        ctl.step(&down(0.0, 0.0));
        ctl.step(&up(450.0, 300.0));
        ctl.tick();
        ctl.restart();
        assert_eq!(ctl.phase(), GamePhase::Idle);
        assert_eq!(ctl.velocity(), None);
        assert_eq!(ctl.position(), Vec2::new(50.0, 300.0));
    }

    #[test]
    fn restart_from_won_goes_through_idle() {
        let mut ctl = ShotController::default();
        ctl.place_ball(Vec2::new(440.0, 300.0));
        ctl.step(&down(0.0, 0.0));
        ctl.step(&up(440.0, 300.0));
        settle(&mut ctl);
        assert_eq!(ctl.phase(), GamePhase::Won);

        ctl.restart();
        assert_eq!(ctl.phase(), GamePhase::Idle);
        assert_eq!(ctl.strokes(), 0);
        assert_eq!(ctl.position(), Vec2::new(50.0, 300.0));
        // Back in Idle, a new gesture is accepted.
        assert_eq!(ctl.step(&down(0.0, 0.0)), Some(GameEvent::AimStarted));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn velocity_exists_only_while_moving(
                tx in 0.0f64..900.0,
                ty in 0.0f64..600.0,
                ticks in 0usize..400,
            ) {
                let mut ctl = ShotController::default();
                prop_assert!(ctl.velocity().is_none());
                ctl.step(&down(tx, ty));
                prop_assert!(ctl.velocity().is_none());
                ctl.step(&up(tx, ty));
                for _ in 0..ticks {
                    ctl.tick();
                    prop_assert_eq!(
                        ctl.velocity().is_some(),
                        ctl.phase() == GamePhase::Moving
                    );
                }
            }

            #[test]
            fn shot_ends_in_idle_or_won(
                tx in 0.0f64..900.0,
                ty in 0.0f64..600.0,
            ) {
                let mut ctl = ShotController::default();
                let ticks = shoot_at(&mut ctl, tx, ty);
                prop_assert!(ticks >= 1 && ticks <= 230, "ticks = {}", ticks);
                let won = ctl.course().hole.captures(ctl.position());
                let expected = if won { GamePhase::Won } else { GamePhase::Idle };
                prop_assert_eq!(ctl.phase(), expected);
            }
        }
    }
}
