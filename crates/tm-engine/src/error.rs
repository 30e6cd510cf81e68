//! Error types for tm-engine

use thiserror::Error;
use tm_core::{CoreError, Direction};
use tm_db::DbError;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Catalog, config or filesystem failure (M001)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// History storage failure outside of an apply (M002)
    #[error(transparent)]
    Db(#[from] DbError),

    /// One migration failed and was rolled back (M003)
    #[error(
        "[M003] Migration {number:06} '{name}' ({direction}) failed, {applied_before} earlier migration(s) of this run remain applied"
    )]
    Apply {
        number: u32,
        name: String,
        direction: Direction,
        applied_before: usize,
        #[source]
        source: DbError,
    },

    /// Request rejected before touching anything (M004)
    #[error("[M004] {0}")]
    Validation(String),
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
