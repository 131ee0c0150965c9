//! Engine configuration.
//!
//! Loaded from a TOML file. Missing or malformed files fall back to defaults.

use std::fs;
use std::path::Path;

use earshot_kernel::{ListenerConfig, MAX_LISTENERS};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "earshot.toml";

/// Errors that can occur while saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Listener cap of the headless engine
    pub max_listeners: usize,
    /// Number of listeners the session creates
    pub scenario_listeners: usize,
    /// Radius of the circle listeners are placed on
    pub scenario_radius: f32,
    /// Registry settings
    pub listeners: ListenerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_listeners: MAX_LISTENERS,
            scenario_listeners: 4,
            scenario_radius: 100.0,
            listeners: ListenerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                },
                Err(e) => {
                    warn!("Failed to parse config file: {e}");
                    Self::default()
                },
            },
            Err(e) => {
                warn!("Failed to read config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, toml::to_string_pretty(self)?)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.max_listeners = self.max_listeners.max(1);
        self.scenario_listeners = self.scenario_listeners.clamp(1, self.max_listeners);
        if !self.scenario_radius.is_finite() || self.scenario_radius <= 0.0 {
            self.scenario_radius = Self::default().scenario_radius;
        }
        self.listeners.validate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_listeners, 8);
        assert_eq!(config.scenario_listeners, 4);
        assert_eq!(config.listeners, ListenerConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig {
            max_listeners: 0,
            scenario_listeners: 50,
            scenario_radius: -3.0,
            listeners: ListenerConfig {
                default_forward: [0.0, 0.0, 0.0],
                default_up: [0.0, 0.0, 1.0],
            },
        };

        config.validate();

        assert_eq!(config.max_listeners, 1);
        assert_eq!(config.scenario_listeners, 1);
        assert!((config.scenario_radius - 100.0).abs() < f32::EPSILON);
        assert_eq!(config.listeners, ListenerConfig::default());
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("earshot.toml");

        let config = EngineConfig {
            max_listeners: 16,
            scenario_listeners: 6,
            ..EngineConfig::default()
        };
        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("earshot.toml");
        fs::write(&config_path, "scenario_listeners = 2\n").expect("write");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.scenario_listeners, 2);
        assert_eq!(loaded.max_listeners, MAX_LISTENERS);
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("earshot.toml");
        fs::write(&config_path, "max_listeners = \"lots\"").expect("write");

        assert_eq!(EngineConfig::load_from(&config_path), EngineConfig::default());
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/earshot.toml");
        assert_eq!(config, EngineConfig::default());
    }
}
