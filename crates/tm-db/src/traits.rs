//! History repository and SQL executor traits

use crate::error::{DbError, DbResult};
use tm_core::Migration;

/// Append-only ledger of applied and rolled-back migrations.
///
/// One implementation exists per storage backend. The engine holds it as a
/// `Box<dyn HistoryRepository>` chosen once at startup.
pub trait HistoryRepository {
    /// Backend identifier for logging
    fn backend_name(&self) -> &'static str;

    /// Create the history storage if it does not exist. Idempotent.
    fn ensure_history_table(&self) -> DbResult<()>;

    /// Most recently inserted entry, or `None` for empty or missing history
    fn load_last_applied(&self) -> DbResult<Option<Migration>>;

    /// Every entry in insertion order; empty when the history does not exist
    fn load_all_history(&self) -> DbResult<Vec<Migration>>;

    /// Record the migration and execute its body as one atomic unit.
    ///
    /// On error nothing from this migration survives: neither the history
    /// entry nor any statement of the body.
    fn apply_migration(&self, migration: &Migration) -> DbResult<()>;

    /// Destroy the whole history. Missing history is not an error.
    fn drop_history_table(&self) -> DbResult<()>;
}

/// Raw SQL execution against a target database
pub trait SqlExecutor {
    /// Execute one or more statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error.
pub fn with_transaction<D, F, T>(db: &D, body: F) -> DbResult<T>
where
    D: SqlExecutor + ?Sized,
    F: FnOnce() -> DbResult<T>,
{
    db.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

    let result = body();

    match &result {
        Ok(_) => {
            if let Err(commit_err) = db.execute_batch("COMMIT") {
                let _ = db.execute_batch("ROLLBACK");
                return Err(DbError::TransactionError(format!(
                    "COMMIT failed: {commit_err}"
                )));
            }
        }
        Err(_) => {
            if let Err(rollback_err) = db.execute_batch("ROLLBACK") {
                log::warn!("ROLLBACK on {} failed: {}", db.db_type(), rollback_err);
            }
        }
    }
    result
}
