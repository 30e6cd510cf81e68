//! Error types for tm-core

use thiserror::Error;

/// Core error type for tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Filename stem does not follow the catalog grammar
    #[error("[C004] Invalid migration file name '{stem}': {reason}")]
    InvalidFileName { stem: String, reason: String },

    /// C005: Two catalog files of the same direction share a number
    #[error("[C005] Duplicate {direction} migration {number:06}: '{first}' and '{second}'")]
    DuplicateMigration {
        number: u32,
        direction: String,
        first: String,
        second: String,
    },

    /// C006: Migration name cannot be used in a file name
    #[error("[C006] Invalid migration name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// C007: Requested count must be positive
    #[error("[C007] Invalid count {count}: must be at least 1")]
    InvalidCount { count: usize },

    /// C008: IO error
    #[error("[C008] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C009: IO error with file path context
    #[error("[C009] IO error on '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}

impl CoreError {
    /// Attach a path to an [`std::io::Error`].
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
