//! Error types for tm-db

use thiserror::Error;

/// History storage errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// A history entry could not be read back (D004)
    #[error("[D004] Malformed history entry '{line}': {reason}")]
    HistoryParse { line: String, reason: String },

    /// History log read or write failure (D005)
    #[error("[D005] History log IO error on '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

impl DbError {
    /// Attach a path to an [`std::io::Error`].
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        DbError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
