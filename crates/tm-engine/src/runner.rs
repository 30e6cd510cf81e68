//! Migration runner: applies pending migrations in order

use crate::error::{EngineError, EngineResult};
use crate::reconcile::{self, Position};
use serde::Serialize;
use std::time::{Duration, Instant};
use tm_core::{Direction, FileRepository, Migration};
use tm_db::HistoryRepository;

/// Result of one `up` or `down` invocation
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Direction that was run
    pub direction: Direction,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Migrations applied (or that would be applied), in execution order
    pub migrations: Vec<Migration>,

    /// Wall time of the run
    pub duration: Duration,
}

impl RunOutcome {
    /// Number of migrations applied (or planned)
    pub fn count(&self) -> usize {
        self.migrations.len()
    }

    /// True when nothing was pending
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

/// Snapshot of catalog vs history, for `status`
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    /// Reconciler state
    pub position: Position,

    /// Last history entry, if any
    pub last_applied: Option<Migration>,

    /// Up migrations that `up(0)` would apply
    pub pending: Vec<Migration>,
}

/// Runs catalog migrations against a history repository
pub struct Migrator<'a, F: FileRepository> {
    files: &'a F,
    history: &'a dyn HistoryRepository,
}

impl<'a, F: FileRepository> Migrator<'a, F> {
    /// Create a new migrator
    pub fn new(files: &'a F, history: &'a dyn HistoryRepository) -> Self {
        Self { files, history }
    }

    /// Apply up to `count` pending up migrations (`0` = all)
    pub fn up(&self, count: usize, dry_run: bool) -> EngineResult<RunOutcome> {
        self.run(Direction::Up, count, dry_run)
    }

    /// Roll back up to `count` migrations (`0` = all)
    pub fn down(&self, count: usize, dry_run: bool) -> EngineResult<RunOutcome> {
        self.run(Direction::Down, count, dry_run)
    }

    /// Migrations `up`/`down` would run, without loading bodies
    pub fn pending(&self, direction: Direction, count: usize) -> EngineResult<Vec<Migration>> {
        let catalog = self.files.list_migrations(direction)?;
        let last = self.history.load_last_applied()?;

        log::debug!(
            "Catalog has {} {} migration(s), last applied: {}",
            catalog.len(),
            direction,
            last.as_ref()
                .map_or_else(|| "none".to_string(), |m| m.to_string())
        );

        Ok(match direction {
            Direction::Up => reconcile::pending_up(&catalog, last.as_ref(), count),
            Direction::Down => reconcile::pending_down(&catalog, last.as_ref(), count),
        })
    }

    /// Full history in insertion order
    pub fn history(&self) -> EngineResult<Vec<Migration>> {
        Ok(self.history.load_all_history()?)
    }

    /// Drop the whole history. Catalog files are left alone.
    pub fn purge(&self) -> EngineResult<()> {
        log::info!("Purging {} history", self.history.backend_name());
        Ok(self.history.drop_history_table()?)
    }

    /// Current position of the database relative to the catalog
    pub fn status(&self) -> EngineResult<Status> {
        let catalog = self.files.list_migrations(Direction::Up)?;
        let last_applied = self.history.load_last_applied()?;
        let position = reconcile::position(&catalog, last_applied.as_ref());
        let pending = reconcile::pending_up(&catalog, last_applied.as_ref(), 0);
        Ok(Status {
            position,
            last_applied,
            pending,
        })
    }

    fn run(&self, direction: Direction, count: usize, dry_run: bool) -> EngineResult<RunOutcome> {
        let start = Instant::now();
        let planned = self.pending(direction, count)?;

        if planned.is_empty() {
            log::info!("No migrations to apply");
            return Ok(RunOutcome {
                direction,
                dry_run,
                migrations: Vec::new(),
                duration: start.elapsed(),
            });
        }

        if !dry_run {
            self.history.ensure_history_table()?;
        }

        let mut done = Vec::with_capacity(planned.len());
        for mut migration in planned {
            self.files.load_body(&mut migration)?;

            if dry_run {
                log::info!("Dry run: would apply {}", migration);
            } else {
                self.history
                    .apply_migration(&migration)
                    .map_err(|source| EngineError::Apply {
                        number: migration.number,
                        name: migration.name.clone(),
                        direction: migration.direction,
                        applied_before: done.len(),
                        source,
                    })?;
                match direction {
                    Direction::Up => log::info!("Applied {}", migration),
                    Direction::Down => log::info!("Rolled back {}", migration),
                }
            }
            done.push(migration);
        }

        Ok(RunOutcome {
            direction,
            dry_run,
            migrations: done,
            duration: start.elapsed(),
        })
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
