//! Cleaner: removes generated migrations that were never applied

use crate::error::EngineResult;
use crate::reconcile;
use std::collections::BTreeSet;
use tm_core::{Direction, FileRepository, Migration};
use tm_db::HistoryRepository;

/// Deletes pending pairs from the catalog
pub struct Cleaner<'a, F: FileRepository> {
    files: &'a F,
    history: &'a dyn HistoryRepository,
}

impl<'a, F: FileRepository> Cleaner<'a, F> {
    /// Create a new cleaner
    pub fn new(files: &'a F, history: &'a dyn HistoryRepository) -> Self {
        Self { files, history }
    }

    /// Files both directions of every pending up migration would remove.
    ///
    /// Anything numbered at or below the highest up ever recorded is kept,
    /// even when a later rollback makes it pending again.
    pub fn plan(&self) -> EngineResult<Vec<Migration>> {
        let ups = self.files.list_migrations(Direction::Up)?;
        let history = self.history.load_all_history()?;

        let applied_floor = history
            .iter()
            .filter(|m| m.direction == Direction::Up)
            .map(|m| m.number)
            .max();

        let numbers: BTreeSet<u32> = reconcile::pending_up(&ups, history.last(), 0)
            .iter()
            .map(|m| m.number)
            .filter(|n| applied_floor.map_or(true, |floor| *n > floor))
            .collect();

        let mut targets: Vec<Migration> = ups
            .into_iter()
            .chain(self.files.list_migrations(Direction::Down)?)
            .filter(|m| numbers.contains(&m.number))
            .collect();
        targets.sort_by_key(|m| (m.number, m.direction == Direction::Down));
        Ok(targets)
    }

    /// Delete the planned files. A dry run only reports them.
    ///
    /// Stops at the first failed deletion; files removed before it stay
    /// removed.
    pub fn clean(&self, dry_run: bool) -> EngineResult<Vec<Migration>> {
        let targets = self.plan()?;
        if targets.is_empty() {
            log::info!("Nothing to clean");
            return Ok(targets);
        }

        for migration in &targets {
            let path = migration
                .file_path
                .clone()
                .unwrap_or_else(|| self.files.migration_path(migration));
            if dry_run {
                log::info!("Dry run: would remove {}", path.display());
            } else {
                self.files.delete_file(migration)?;
                log::info!("Removed {}", path.display());
            }
        }
        Ok(targets)
    }
}

#[cfg(test)]
#[path = "cleaner_test.rs"]
mod tests;
