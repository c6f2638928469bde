//! Error types for the Pod validator
//!
//! These cover the machinery around validation (reading inputs, loading
//! configuration, writing reports). Problems inside a document are never
//! errors; they are [`Diagnostic`](crate::Diagnostic)s.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for validator operations
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Validator errors
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("No YAML files found in {}", .0.display())]
    NoTargets(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
