//! Engine configuration.
//!
//! Loaded from `exam-schedule.toml` in the working directory, then
//! overridden by `EXAM_SCHEDULE_*` environment variables.
//!
//! ```toml
//! weight_tolerance = 1e-6
//! default_session_minutes = 120
//!
//! [[rooms]]
//! code = "B1.04"
//! capacity = 40
//! computers = 40
//! ```

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

use crate::models::{Room, DEFAULT_SESSION_MINUTES};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "exam-schedule.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "EXAM_SCHEDULE_";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Tolerance for the weight-sum rule.
    #[serde(default = "default_weight_tolerance")]
    pub weight_tolerance: f64,
    /// Session length for elements without an explicit duration.
    #[serde(default = "default_session_minutes")]
    pub default_session_minutes: u32,
    /// Rooms registered at startup.
    #[serde(default)]
    pub rooms: Vec<Room>,
}

fn default_weight_tolerance() -> f64 {
    1e-6
}

fn default_session_minutes() -> u32 {
    DEFAULT_SESSION_MINUTES
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weight_tolerance: default_weight_tolerance(),
            default_session_minutes: default_session_minutes(),
            rooms: Vec::new(),
        }
    }
}

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl EngineConfig {
    /// Loads the configuration from [`CONFIG_FILE`] and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Extracts the configuration from a caller-assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    /// Adds a startup room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let config = EngineConfig::load().expect("defaults");
            assert_eq!(config, EngineConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                weight_tolerance = 0.001

                [[rooms]]
                code = "B1.04"
                capacity = 40
                computers = 20

                [[rooms]]
                code = "A0.01"
                capacity = 120
                available = false
                "#,
            )?;
            jail.set_env("EXAM_SCHEDULE_DEFAULT_SESSION_MINUTES", "90");

            let config = EngineConfig::load().expect("valid config");
            assert!((config.weight_tolerance - 0.001).abs() < 1e-12);
            assert_eq!(config.default_session_minutes, 90);
            assert_eq!(config.rooms.len(), 2);
            assert_eq!(config.rooms[0].computers, 20);
            assert!(!config.rooms[1].available);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_error() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "default_session_minutes = \"long\"")?;
            assert!(EngineConfig::load().is_err());
            Ok(())
        });
    }
}
