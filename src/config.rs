//! Configuration system for the pulse simulator.
//!
//! This module provides YAML/JSON configuration file support for the
//! parameters that are not part of the network description itself.
//!
//! # Configuration File Structure
//!
//! ```yaml
//! simulation:
//!   presses: 1000
//!   button: button
//!   broadcaster: broadcaster
//!   terminal_sink: rx
//!   max_signals_per_press: 1000000
//!   max_analysis_presses: 1000000
//!   log_level: info
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::types::{ModuleName, PressCount, BROADCASTER, BUTTON, TERMINAL_SINK};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown file format: {0}")]
    UnknownFormat(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Simulation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Presses run by the statistics driver
    #[serde(default = "default_presses")]
    pub presses: PressCount,

    /// Source name of the synthetic pulse that starts a press
    #[serde(default = "default_button")]
    pub button: ModuleName,

    /// Module that receives the button's pulse
    #[serde(default = "default_broadcaster")]
    pub broadcaster: ModuleName,

    /// Sink whose feeder's sources are tracked by the cycle analyzer
    #[serde(default = "default_terminal_sink")]
    pub terminal_sink: ModuleName,

    /// Signals one press may process before it is declared runaway
    #[serde(default = "default_max_signals")]
    pub max_signals_per_press: u64,

    /// Presses the cycle analyzer may run before giving up
    #[serde(default = "default_max_analysis_presses")]
    pub max_analysis_presses: PressCount,

    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_presses() -> PressCount {
    1000
}

fn default_button() -> ModuleName {
    BUTTON.to_string()
}

fn default_broadcaster() -> ModuleName {
    BROADCASTER.to_string()
}

fn default_terminal_sink() -> ModuleName {
    TERMINAL_SINK.to_string()
}

fn default_max_signals() -> u64 {
    1_000_000
}

fn default_max_analysis_presses() -> PressCount {
    1_000_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            presses: default_presses(),
            button: default_button(),
            broadcaster: default_broadcaster(),
            terminal_sink: default_terminal_sink(),
            max_signals_per_press: default_max_signals(),
            max_analysis_presses: default_max_analysis_presses(),
            log_level: default_log_level(),
        }
    }
}

impl SimulationParams {
    /// Validates the parameters.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.presses == 0 {
            return Err(ConfigError::Validation("presses must be at least 1".to_string()));
        }
        if self.max_signals_per_press == 0 {
            return Err(ConfigError::Validation(
                "max_signals_per_press must be at least 1".to_string(),
            ));
        }
        if self.max_analysis_presses == 0 {
            return Err(ConfigError::Validation(
                "max_analysis_presses must be at least 1".to_string(),
            ));
        }

        for (field, value) in [
            ("button", &self.button),
            ("broadcaster", &self.broadcaster),
            ("terminal_sink", &self.terminal_sink),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{} must not be empty", field)));
            }
        }

        if self.button == self.broadcaster {
            return Err(ConfigError::Validation(format!(
                "button and broadcaster share the name '{}'",
                self.button
            )));
        }

        if self.terminal_sink == self.broadcaster {
            tracing::warn!(
                "terminal_sink '{}' is the broadcaster; cycle analysis will find no feeder",
                self.terminal_sink
            );
        }

        Ok(())
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Simulation parameters
    #[serde(default)]
    pub simulation: SimulationParams,
}

impl SimConfig {
    /// Creates a configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, auto-detecting format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(ConfigError::UnknownFormat(ext.to_string())),
        }
    }

    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.simulation.validate()
    }

    /// Converts to YAML string.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Converts to JSON string.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for creating SimConfig programmatically.
#[derive(Default)]
pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of presses for pulse statistics.
    pub fn presses(mut self, presses: PressCount) -> Self {
        self.config.simulation.presses = presses;
        self
    }

    /// Sets the button source name.
    pub fn button(mut self, name: impl Into<ModuleName>) -> Self {
        self.config.simulation.button = name.into();
        self
    }

    /// Sets the broadcaster name.
    pub fn broadcaster(mut self, name: impl Into<ModuleName>) -> Self {
        self.config.simulation.broadcaster = name.into();
        self
    }

    /// Sets the terminal sink name.
    pub fn terminal_sink(mut self, name: impl Into<ModuleName>) -> Self {
        self.config.simulation.terminal_sink = name.into();
        self
    }

    /// Sets the per-press signal cap.
    pub fn max_signals_per_press(mut self, limit: u64) -> Self {
        self.config.simulation.max_signals_per_press = limit;
        self
    }

    /// Sets the cycle analysis press cap.
    pub fn max_analysis_presses(mut self, limit: PressCount) -> Self {
        self.config.simulation.max_analysis_presses = limit;
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.simulation.log_level = level.into();
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> ConfigResult<SimConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
