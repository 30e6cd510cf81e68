//! Log-file history backend.
//!
//! History lives in an append-only text file next to the catalog, one entry
//! per line: `<catalog stem>\t<RFC 3339 timestamp>`. Migration bodies still
//! run against a SQL database through a [`SqlExecutor`].

use crate::error::{DbError, DbResult};
use crate::traits::{with_transaction, HistoryRepository, SqlExecutor};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tm_core::{format_stem, parse_stem, Migration};

/// History kept in a log file, with SQL executed by `executor`
pub struct LogFileHistory {
    path: PathBuf,
    executor: Box<dyn SqlExecutor>,
}

impl LogFileHistory {
    /// Create a log-file history at `path` executing SQL through `executor`
    pub fn new(path: impl Into<PathBuf>, executor: Box<dyn SqlExecutor>) -> Self {
        Self {
            path: path.into(),
            executor,
        }
    }

    /// Location of the history log
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> DbResult<Vec<Migration>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| DbError::io(&self.path, e))?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_line)
            .collect()
    }

    fn current_len(&self) -> DbResult<Option<u64>> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DbError::io(&self.path, e)),
        }
    }

    fn append_line(&self, line: &str) -> DbResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| DbError::io(&self.path, e))?;
        writeln!(file, "{line}").map_err(|e| DbError::io(&self.path, e))?;
        file.sync_all().map_err(|e| DbError::io(&self.path, e))
    }

    /// Undo a partial append after a failed apply.
    fn restore_len(&self, previous: Option<u64>) {
        let restored = match previous {
            Some(len) => OpenOptions::new()
                .write(true)
                .open(&self.path)
                .and_then(|file| file.set_len(len)),
            None if self.path.exists() => fs::remove_file(&self.path),
            None => Ok(()),
        };
        if let Err(e) = restored {
            log::warn!(
                "Could not restore history log {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl HistoryRepository for LogFileHistory {
    fn backend_name(&self) -> &'static str {
        "log"
    }

    fn ensure_history_table(&self) -> DbResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        log::debug!("Creating history log {}", self.path.display());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| DbError::io(parent, e))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| DbError::io(&self.path, e))?;
        Ok(())
    }

    fn load_last_applied(&self) -> DbResult<Option<Migration>> {
        Ok(self.read_entries()?.pop())
    }

    fn load_all_history(&self) -> DbResult<Vec<Migration>> {
        self.read_entries()
    }

    fn apply_migration(&self, migration: &Migration) -> DbResult<()> {
        let line = format_line(migration, Utc::now());
        let previous = self.current_len()?;

        let result = with_transaction(self.executor.as_ref(), || {
            if !migration.query.trim().is_empty() {
                self.executor.execute_batch(&migration.query)?;
            }
            self.append_line(&line)
        });

        // The apply error wins over anything the size check reports
        if result.is_err() && self.current_len().ok().flatten() != previous {
            self.restore_len(previous);
        }
        result
    }

    fn drop_history_table(&self) -> DbResult<()> {
        if self.path.exists() {
            log::debug!("Removing history log {}", self.path.display());
            fs::remove_file(&self.path).map_err(|e| DbError::io(&self.path, e))?;
        }
        Ok(())
    }
}

/// Render one history line for `migration` applied at `at`
pub fn format_line(migration: &Migration, at: DateTime<Utc>) -> String {
    format!(
        "{}\t{}",
        format_stem(migration.number, &migration.name, migration.direction),
        at.to_rfc3339_opts(SecondsFormat::Secs, false)
    )
}

/// Parse one history line back into a record
pub fn parse_line(line: &str) -> DbResult<Migration> {
    let malformed = |reason: String| DbError::HistoryParse {
        line: line.to_string(),
        reason,
    };

    let (stem, created) = line
        .split_once('\t')
        .ok_or_else(|| malformed("expected '<stem>\\t<timestamp>'".to_string()))?;

    let mut migration = parse_stem(stem.trim()).map_err(|e| malformed(e.to_string()))?;
    let created = DateTime::parse_from_rfc3339(created.trim())
        .map_err(|e| malformed(format!("bad timestamp: {e}")))?;
    migration.created_at = Some(created.with_timezone(&Utc));
    Ok(migration)
}

#[cfg(test)]
#[path = "logfile_test.rs"]
mod tests;
