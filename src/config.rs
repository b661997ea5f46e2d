//! World configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value is out of range
    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Timing settings for a [`World`](crate::world::World).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// When set, `advance_one_frame` integrates by this many seconds instead of
    /// measuring the wall clock.
    pub fixed_timestep: Option<f64>,
    /// Upper bound for a measured frame delta, in seconds.
    pub max_timestep: f64,
    /// Minimum number of seconds between two frames in `run_until`.
    pub update_interval: Option<f64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: None,
            max_timestep: 0.25,
            update_interval: None,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serializes to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dt) = self.fixed_timestep {
            if !dt.is_finite() || dt < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "fixed_timestep must be a non-negative number, got {dt}"
                )));
            }
        }
        if !self.max_timestep.is_finite() || self.max_timestep <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_timestep must be positive, got {}",
                self.max_timestep
            )));
        }
        if let Some(interval) = self.update_interval {
            if !interval.is_finite() || interval < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "update_interval must be a non-negative number, got {interval}"
                )));
            }
        }
        Ok(())
    }
}
