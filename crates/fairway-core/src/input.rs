use serde::{Deserialize, Serialize};

/// Input forwarded by a rendering surface to the game.
///
/// Pointer coordinates are already translated into the same view space as
/// the ball position; the surface owns that translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardInput {
    PointerDown { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    /// The "play again" affordance.
    Replay,
}

