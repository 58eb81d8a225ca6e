use serde::{Deserialize, Serialize};

use fairway_core::geometry::Vec2;

use crate::aim::Aim;
use crate::config::GolfConfig;

/// What a single tick did to the ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No shot in flight; nothing moved.
    AtRest,
    /// Moved and still above the stop threshold.
    Rolling,
    /// Moved and dropped below the stop threshold. The shot is over.
    Stopped,
}

/// The ball. Velocity only exists while a shot is in flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BallState {
    pub position: Vec2,
    #[serde(skip)]
    velocity: Option<Vec2>,
}

impl BallState {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            position: spawn,
            velocity: None,
        }
    }

    pub fn velocity(&self) -> Option<Vec2> {
        self.velocity
    }

    pub fn is_moving(&self) -> bool {
        self.velocity.is_some()
    }

    /// Start a shot. Replaces any velocity left from a previous shot.
    pub fn launch(&mut self, aim: &Aim) {
        self.velocity = Some(aim.velocity());
    }

    /// Advance one tick: step the position, decay the velocity, then check the
    /// stop condition. A stopped ball drops its velocity.
    pub fn advance(&mut self, config: &GolfConfig) -> TickOutcome {
        let Some(mut velocity) = self.velocity else {
            return TickOutcome::AtRest;
        };

        self.position += velocity.scale(config.step_factor);
        velocity = velocity.scale(config.decay);

        if is_stopped(velocity, config.stop_threshold) {
            self.velocity = None;
            TickOutcome::Stopped
        } else {
            self.velocity = Some(velocity);
            TickOutcome::Rolling
        }
    }

    /// Put the ball back on the tee with no shot in flight.
    pub fn reset(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.velocity = None;
    }
}

/// Both axes must be under the threshold; a NaN component counts as stopped.
pub fn is_stopped(velocity: Vec2, threshold: f64) -> bool {
    !(velocity.x.abs() >= threshold || velocity.y.abs() >= threshold)
}
