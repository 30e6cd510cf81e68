//! Migration record shared by the catalog and the history ledger

use crate::direction::Direction;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One numbered, directional unit of SQL change.
///
/// The same type describes a catalog file (with `file_path` and, once loaded,
/// `query`) and a history row (with `created_at`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// Sequence number shared by an up/down pair
    pub number: u32,

    /// Sanitized name; empty when the migration is unnamed
    pub name: String,

    /// Up or down
    pub direction: Direction,

    /// Backing file, set once the record is file-backed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// SQL body, loaded lazily from `file_path`
    #[serde(skip)]
    pub query: String,

    /// Set by the history store when the migration is applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Migration {
    /// Create a record with a sanitized name and no file or body attached.
    pub fn new(number: u32, name: &str, direction: Direction) -> Self {
        Self {
            number,
            name: sanitize_name(name),
            direction,
            file_path: None,
            query: String::new(),
            created_at: None,
        }
    }

    /// Copy of this record for the other direction, sharing number and name.
    pub fn counterpart(&self) -> Self {
        Self::new(self.number, &self.name, self.direction.opposite())
    }

    /// `(number, name, direction)` triple, ignoring file and timestamp data.
    pub fn identity(&self) -> (u32, &str, Direction) {
        (self.number, self.name.as_str(), self.direction)
    }
}

impl fmt::Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{:06} ({})", self.number, self.direction)
        } else {
            write!(f, "{:06} {} ({})", self.number, self.name, self.direction)
        }
    }
}

/// Replace spaces with underscores so the name survives a file-name round trip.
pub fn sanitize_name(name: &str) -> String {
    name.trim().replace(' ', "_")
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
