//! SQLite history backend

use crate::error::{DbError, DbResult};
use crate::history_row::HistoryRow;
use crate::traits::{with_transaction, HistoryRepository, SqlExecutor};
use rusqlite::Connection;
use std::path::Path;
use tm_core::Migration;

/// SQLite connection owning the history table `table`
pub struct SqliteBackend {
    conn: Connection,
    table: String,
}

impl SqliteBackend {
    /// Create a new in-memory SQLite connection
    pub fn in_memory(table: &str) -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Create a new SQLite connection from a file path
    pub fn from_path(path: &Path, table: &str) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str, table: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory(table)
        } else {
            Self::from_path(Path::new(path), table)
        }
    }

    /// Borrow the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn table_exists(&self) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            rusqlite::params![self.table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn query_history(&self, order: &str, limit: Option<usize>) -> DbResult<Vec<Migration>> {
        if !self.table_exists()? {
            return Ok(Vec::new());
        }

        let mut sql = format!(
            "SELECT number, name, direction, created FROM {} ORDER BY id {}",
            self.table, order
        );
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(HistoryRow {
                    number: row.get(0)?,
                    name: row.get(1)?,
                    direction: row.get(2)?,
                    created: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(HistoryRow::into_migration).collect()
    }
}

impl SqlExecutor for SqliteBackend {
    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn db_type(&self) -> &'static str {
        "sqlite"
    }
}

impl HistoryRepository for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn ensure_history_table(&self) -> DbResult<()> {
        log::debug!("Ensuring SQLite history table {}", self.table);
        self.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 id        INTEGER PRIMARY KEY AUTOINCREMENT,
                 number    INTEGER NOT NULL,
                 name      TEXT NOT NULL,
                 direction TEXT NOT NULL,
                 created   DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
             );",
            self.table
        ))
    }

    fn load_last_applied(&self) -> DbResult<Option<Migration>> {
        Ok(self.query_history("DESC", Some(1))?.into_iter().next())
    }

    fn load_all_history(&self) -> DbResult<Vec<Migration>> {
        self.query_history("ASC", None)
    }

    fn apply_migration(&self, migration: &Migration) -> DbResult<()> {
        let insert = format!(
            "INSERT INTO {} (number, name, direction) VALUES (?1, ?2, ?3)",
            self.table
        );
        with_transaction(self, || {
            self.conn.execute(
                &insert,
                rusqlite::params![
                    i64::from(migration.number),
                    migration.name,
                    migration.direction.as_str()
                ],
            )?;
            if !migration.query.trim().is_empty() {
                self.execute_batch(&migration.query)?;
            }
            Ok(())
        })
    }

    fn drop_history_table(&self) -> DbResult<()> {
        log::debug!("Dropping SQLite history table {}", self.table);
        self.execute_batch(&format!("DROP TABLE IF EXISTS {};", self.table))
    }
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;
