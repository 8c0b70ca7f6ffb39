//! Error types for vault configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading or serializing settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a settings file.
    #[error("failed to read settings file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML settings.
    #[error("failed to parse settings file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },
}
