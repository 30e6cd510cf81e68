//! tm-db - History storage for tidemark
//!
//! This crate provides the `HistoryRepository` trait and its backends:
//! DuckDB and SQLite history tables, and an append-only log file that runs
//! SQL through any `SqlExecutor`.

pub mod duckdb;
pub mod error;
mod history_row;
pub mod logfile;
pub mod sqlite;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use logfile::LogFileHistory;
pub use sqlite::SqliteBackend;
pub use traits::{with_transaction, HistoryRepository, SqlExecutor};
