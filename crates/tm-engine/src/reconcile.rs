//! Reconciler: which catalog entries are pending, given the last history entry.
//!
//! Up and down share one number space, so the start rule depends on the
//! direction that last wrote history:
//!
//! | last entry   | `up` starts at          | `down` starts at (descending) |
//! |--------------|-------------------------|-------------------------------|
//! | none         | first entry             | highest entry                 |
//! | `(K, up)`    | first number `> K`      | first number `<= K`           |
//! | `(K, down)`  | first number `>= K`     | first number `< K`            |
//!
//! Everything here is pure: inputs are borrowed, results are new vectors.

use serde::Serialize;
use tm_core::{Direction, Migration};

/// Where the database stands relative to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Position {
    /// Nothing has ever been applied
    Empty,
    /// Last entry is an up and no up migration is pending
    Synced,
    /// Last entry is an up and `pending` up migrations follow it
    Behind { pending: usize },
    /// Last entry rolled back `number`
    PartiallyRolledBack { number: u32 },
}

/// Pending up migrations, ascending.
///
/// `catalog` is the ascending up listing. `count == 0` selects everything
/// remaining, otherwise at most `count` entries.
pub fn pending_up(catalog: &[Migration], last: Option<&Migration>, count: usize) -> Vec<Migration> {
    let start = match last {
        None => Some(0),
        Some(m) if m.direction == Direction::Up => {
            catalog.iter().position(|c| c.number > m.number)
        }
        Some(m) => catalog.iter().position(|c| c.number >= m.number),
    };
    select(catalog.iter(), start, count)
}

/// Pending down migrations, descending.
///
/// `catalog` is the ascending down listing; it is walked from the top.
pub fn pending_down(
    catalog: &[Migration],
    last: Option<&Migration>,
    count: usize,
) -> Vec<Migration> {
    let descending = || catalog.iter().rev();
    let start = match last {
        None => Some(0),
        Some(m) if m.direction == Direction::Up => descending().position(|c| c.number <= m.number),
        Some(m) => descending().position(|c| c.number < m.number),
    };
    select(descending(), start, count)
}

/// Classify the current position from the up catalog and last history entry.
pub fn position(catalog: &[Migration], last: Option<&Migration>) -> Position {
    match last {
        None => Position::Empty,
        Some(m) if m.direction == Direction::Down => {
            Position::PartiallyRolledBack { number: m.number }
        }
        Some(_) => match pending_up(catalog, last, 0).len() {
            0 => Position::Synced,
            pending => Position::Behind { pending },
        },
    }
}

fn select<'a>(
    entries: impl Iterator<Item = &'a Migration>,
    start: Option<usize>,
    count: usize,
) -> Vec<Migration> {
    let Some(start) = start else {
        return Vec::new();
    };
    let take = if count == 0 { usize::MAX } else { count };
    entries.skip(start).take(take).cloned().collect()
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
