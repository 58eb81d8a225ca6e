use serde::{Deserialize, Serialize};

use fairway_core::geometry::Vec2;

use crate::config::GolfConfig;

/// Launch direction and strength derived from one drag gesture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Aim {
    /// Radians, 0 = +X, measured toward +Y (screen down).
    pub angle: f64,
    /// Always within `[0, max_power]`.
    pub power: f64,
}

impl Aim {
    /// Aim from the ball at `ball` toward the release point `pointer`.
    ///
    /// A zero-length drag gives angle 0 and power 0. Malformed coordinates
    /// (NaN) give power 0 as well.
    pub fn from_drag(ball: Vec2, pointer: Vec2, config: &GolfConfig) -> Self {
        let drag = pointer - ball;
        let angle = drag.y.atan2(drag.x);
        Self {
            angle: if angle.is_nan() { 0.0 } else { angle },
            power: clamp_power(drag.length() / config.power_divisor, config.max_power),
        }
    }

    /// Initial velocity for this aim.
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.angle.cos() * self.power, self.angle.sin() * self.power)
    }
}

/// Clamp `power` into `[0, max]`, mapping NaN to 0.
pub fn clamp_power(power: f64, max: f64) -> f64 {
    if power.is_nan() {
        return 0.0;
    }
    power.clamp(0.0, max)
}
