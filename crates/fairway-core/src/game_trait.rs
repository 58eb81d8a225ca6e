use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::input::BoardInput;

/// Default simulation tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(20);

/// Core trait a Fairway game implements.
///
/// The host owns scheduling and presentation; the game only owns its state.
/// Every method runs on the host's single task, so an input can never land
/// in the middle of an `update`.
pub trait FairwayGame: Send {
    /// Descriptive metadata shown by a surface.
    fn metadata(&self) -> GameMetadata;

    /// Put the game into its starting state.
    fn init(&mut self);

    /// Apply one input from the rendering surface.
    fn apply_input(&mut self, input: &BoardInput) -> Vec<GameEvent>;

    /// Advance the simulation by exactly one tick.
    fn update(&mut self) -> Vec<GameEvent>;

    /// Serialize the presentable state (no internal simulation data).
    fn serialize_state(&self) -> Vec<u8>;

    /// Fixed period between ticks while the game is ticking.
    fn tick_interval(&self) -> Duration {
        DEFAULT_TICK_INTERVAL
    }

    /// Whether the host should keep a tick timer armed.
    fn is_ticking(&self) -> bool;

    /// Whether the round has been won.
    fn is_round_complete(&self) -> bool;
}

/// Game metadata for a surface's title area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}

/// Events emitted by a game on input or tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    AimStarted,
    ShotTaken { angle: f64, power: f64 },
    BallStopped { x: f64, y: f64 },
    HoleWon { strokes: u32 },
    Replayed,
}
