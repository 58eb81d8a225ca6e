use serde::{Deserialize, Serialize};

use fairway_core::geometry::Vec2;

/// Tunables for the shot simulation and the single hole.
///
/// Defaults reproduce the reference board exactly; override them only for
/// experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GolfConfig {
    /// Milliseconds between simulation ticks.
    pub tick_ms: u64,
    /// Fraction of velocity added to position each tick.
    pub step_factor: f64,
    /// Velocity multiplier applied after each tick.
    pub decay: f64,
    /// Per-axis speed below which the ball counts as stopped.
    pub stop_threshold: f64,
    /// Drag distance is divided by this to get power.
    pub power_divisor: f64,
    /// Upper bound on shot power.
    pub max_power: f64,
    /// Where the ball starts and where replay puts it.
    pub spawn: Vec2,
    /// Hole center.
    pub hole: Vec2,
    /// A stopped ball strictly closer than this to the hole is holed.
    pub capture_radius: f64,
}

impl Default for GolfConfig {
    fn default() -> Self {
        Self {
            tick_ms: 20,
            step_factor: 0.1,
            decay: 0.98,
            stop_threshold: 0.5,
            power_divisor: 10.0,
            max_power: 50.0,
            spawn: Vec2::new(50.0, 300.0),
            hole: Vec2::new(450.0, 300.0),
            capture_radius: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroTickPeriod,
    /// Decay outside (0, 1) would never stop the ball.
    DecayOutOfRange(f64),
    /// Must be finite and strictly positive.
    InvalidScalar { field: &'static str, value: f64 },
    NonFinitePoint { field: &'static str },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTickPeriod => write!(f, "tick_ms must be > 0"),
            Self::DecayOutOfRange(d) => write!(f, "decay must be in (0, 1), got {d}"),
            Self::InvalidScalar { field, value } => {
                write!(f, "{field} must be finite and > 0, got {value}")
            },
            Self::NonFinitePoint { field } => write!(f, "{field} must have finite coordinates"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GolfConfig {
    /// Load config from `FAIRWAY_GOLF_CONFIG` or `config/golf.toml`, falling
    /// back to defaults.
    pub fn load() -> Self {
        let path = std::env::var("FAIRWAY_GOLF_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "config/golf.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path, "Loaded golf configuration");
                    config
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    /// Check the invariants the simulation relies on to terminate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.decay.is_nan() || self.decay <= 0.0 || self.decay >= 1.0 {
            return Err(ConfigError::DecayOutOfRange(self.decay));
        }
        for (field, value) in [
            ("step_factor", self.step_factor),
            ("stop_threshold", self.stop_threshold),
            ("power_divisor", self.power_divisor),
            ("max_power", self.max_power),
            ("capture_radius", self.capture_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidScalar { field, value });
            }
        }
        if !self.spawn.is_finite() {
            return Err(ConfigError::NonFinitePoint { field: "spawn" });
        }
        if !self.hole.is_finite() {
            return Err(ConfigError::NonFinitePoint { field: "hole" });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_ms)
    }
}
