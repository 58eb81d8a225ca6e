use serde::Deserialize;

use fairway_golf::config::{ConfigError, GolfConfig};

/// Top-level host configuration, loaded from `fairway.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Write game events to stdout alongside frames.
    pub echo_events: bool,
    /// Inline golf tunables. When absent, `GolfConfig::load()` decides.
    pub golf: Option<GolfConfig>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            echo_events: true,
            golf: None,
        }
    }
}

impl HostConfig {
    /// Effective golf configuration.
    pub fn golf(&self) -> GolfConfig {
        self.golf.clone().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.golf().validate()
    }

    /// Load config from `fairway.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("fairway.toml") {
            Ok(content) => match toml::from_str::<HostConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from fairway.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse fairway.toml: {e}, using defaults");
                    HostConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No fairway.toml found, using defaults");
                HostConfig::default()
            },
        };

        if config.golf.is_none() {
            config.golf = Some(GolfConfig::load());
        }
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `FAIRWAY_*` overrides read through `lookup`.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("FAIRWAY_TICK_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            let mut golf = self.golf();
            golf.tick_ms = ms;
            self.golf = Some(golf);
        }
        if let Some(val) = lookup("FAIRWAY_ECHO_EVENTS")
            && let Ok(echo) = val.parse::<bool>()
        {
            self.echo_events = echo;
        }
    }
}
