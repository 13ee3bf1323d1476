//! Error taxonomy for configuration loading.

use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A config file failed to parse as TOML.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path that failed to parse.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// A field failed validation after the config was fully merged.
    #[error("invalid configuration field {field}: {message}")]
    ValidationError {
        /// Dotted field path.
        field: String,
        /// Human-readable explanation.
        message: String,
    },
    /// The user's home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Convenience alias for results in this crate.
pub type ConfigResult<T> = Result<T, ConfigError>;
