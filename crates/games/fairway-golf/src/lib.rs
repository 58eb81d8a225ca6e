pub mod aim;
pub mod config;
pub mod controller;
pub mod course;
pub mod physics;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use fairway_core::game_trait::{FairwayGame, GameEvent, GameMetadata};
use fairway_core::geometry::Vec2;
use fairway_core::input::BoardInput;

use config::GolfConfig;
use controller::{GamePhase, ShotController};

/// What a rendering surface needs to draw the board.
///
/// Velocity is deliberately absent; it never leaves the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GolfState {
    pub ball: Vec2,
    pub hole: Vec2,
    pub phase: GamePhase,
    pub strokes: u32,
}

impl GolfState {
    /// Show the aim line while the pointer is held.
    pub fn show_aim_indicator(&self) -> bool {
        self.phase == GamePhase::Aiming
    }

    /// Show the "You Win" overlay and its replay button.
    pub fn show_win_banner(&self) -> bool {
        self.phase == GamePhase::Won
    }
}

/// The single-hole game, implementing `FairwayGame`.
pub struct MiniGolf {
    controller: ShotController,
}

impl MiniGolf {
    pub fn new() -> Self {
        Self::with_config(GolfConfig::default())
    }

    pub fn with_config(config: GolfConfig) -> Self {
        Self {
            controller: ShotController::new(config),
        }
    }

    pub fn controller(&self) -> &ShotController {
        &self.controller
    }

    /// Snapshot of the presentable state.
    pub fn state(&self) -> GolfState {
        GolfState {
            ball: self.controller.position(),
            hole: self.controller.course().hole.position,
            phase: self.controller.phase(),
            strokes: self.controller.strokes(),
        }
    }
}

impl Default for MiniGolf {
    fn default() -> Self {
        Self::new()
    }
}

impl FairwayGame for MiniGolf {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Mini-Golf".to_string(),
            description: format!(
                "{}: drag from the ball and release to shoot. Sink it in the cup.",
                self.controller.course().name
            ),
        }
    }

    fn init(&mut self) {
        self.controller.restart();
    }

    fn apply_input(&mut self, input: &BoardInput) -> Vec<GameEvent> {
        self.controller.step(input).into_iter().collect()
    }

    fn update(&mut self) -> Vec<GameEvent> {
        self.controller.tick()
    }

    fn serialize_state(&self) -> Vec<u8> {
        match rmp_serde::to_vec_named(&self.state()) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize golf state");
                Vec::new()
            },
        }
    }

    fn tick_interval(&self) -> Duration {
        self.controller.config().tick_interval()
    }

    fn is_ticking(&self) -> bool {
        self.controller.phase() == GamePhase::Moving
    }

    fn is_round_complete(&self) -> bool {
        self.controller.phase() == GamePhase::Won
    }
}
