//! Crate-level error type.

use crate::builder::ConfigError;
use crate::machine::FireError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed state machine configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A trigger could not be fired
    #[error("Fire error: {0}")]
    Fire(#[from] FireError),

    /// Settings file could not be read
    #[error("Failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Settings file could not be parsed
    #[error("Failed to parse settings: {0}")]
    Settings(#[from] toml::de::Error),

    /// Graph JSON could not be produced or read
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for fire-time errors, which leave the machine usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Fire(_))
    }
}
