//! Configuration management
//!
//! Settings are read from a TOML file. Every section and field has a
//! default, so an empty file is a valid configuration.

use crate::equipment::{MachineMode, MachineState};
use crate::error::{Error, Result};
use crate::graph::{DotOptions, RankDirection};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub machine: MachineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub graph: GraphConfig,
}

/// Where the equipment machines start
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineConfig {
    #[serde(default = "default_initial_state")]
    pub initial_state: MachineState,

    #[serde(default = "default_initial_mode")]
    pub initial_mode: MachineMode,

    /// Most recent transitions kept in history; unbounded when absent
    #[serde(default)]
    pub history_limit: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Graph export configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GraphConfig {
    #[serde(default)]
    pub rank_direction: RankDirection,
}

fn default_initial_state() -> MachineState {
    MachineState::PowerOn
}

fn default_initial_mode() -> MachineMode {
    MachineMode::OffLine
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            initial_state: default_initial_state(),
            initial_mode: default_initial_mode(),
            history_limit: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GraphConfig {
    pub fn dot_options(&self) -> DotOptions {
        DotOptions {
            rank_direction: self.rank_direction,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loading config from {:?}", path);
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
