//! Conversion of history table rows into migration records.

use crate::error::{DbError, DbResult};
use chrono::NaiveDateTime;
use tm_core::{Direction, Migration};

/// Timestamp layout both SQL backends hand back for `created`
pub(crate) const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Columns of one history row, as read from the driver
pub(crate) struct HistoryRow {
    pub number: i64,
    pub name: String,
    pub direction: String,
    pub created: Option<String>,
}

impl HistoryRow {
    pub(crate) fn into_migration(self) -> DbResult<Migration> {
        let number = u32::try_from(self.number)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| self.malformed("number must be a positive 32-bit integer"))?;

        let direction: Direction = self
            .direction
            .parse()
            .map_err(|reason: String| self.malformed(&reason))?;

        let created_at = match &self.created {
            Some(s) => Some(
                NaiveDateTime::parse_from_str(s, CREATED_FORMAT)
                    .map_err(|e| self.malformed(&format!("bad created timestamp: {e}")))?
                    .and_utc(),
            ),
            None => None,
        };

        let mut migration = Migration::new(number, &self.name, direction);
        migration.created_at = created_at;
        Ok(migration)
    }

    fn malformed(&self, reason: &str) -> DbError {
        DbError::HistoryParse {
            line: format!("{}|{}|{}", self.number, self.name, self.direction),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "history_row_test.rs"]
mod tests;
