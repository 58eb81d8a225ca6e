use serde::{Deserialize, Serialize};

use fairway_core::geometry::Vec2;

use crate::config::GolfConfig;

/// The target marker: a fixed cup location plus its capture radius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Hole {
    pub position: Vec2,
    pub capture_radius: f64,
}

impl Hole {
    /// Whether a ball resting at `ball` counts as holed. Strictly inside only:
    /// a ball exactly on the rim stays out.
    pub fn captures(&self, ball: Vec2) -> bool {
        ball.distance(self.position) < self.capture_radius
    }
}

/// A single-hole course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub name: String,
    pub spawn_point: Vec2,
    pub hole: Hole,
}

impl Course {
    /// Build the course described by `config`.
    pub fn from_config(config: &GolfConfig) -> Self {
        Self {
            name: "Practice Green".to_string(),
            spawn_point: config.spawn,
            hole: Hole {
                position: config.hole,
                capture_radius: config.capture_radius,
            },
        }
    }
}
