//! Error types for module metadata.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for module metadata operations.
pub type ModuleResult<T> = Result<T, ModuleError>;

/// Errors that can occur while reading module metadata.
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("no module metadata found for source {0}")]
    NotFound(String),

    #[error("module at {source_path} is of kind {found}, not {expected}")]
    KindMismatch {
        source_path: String,
        expected: String,
        found: String,
    },

    #[error("invalid module descriptor {path}: {message}")]
    InvalidDescriptor { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
