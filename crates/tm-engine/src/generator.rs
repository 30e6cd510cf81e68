//! Generator: allocates the next block of numbers and creates paired files

use crate::error::{EngineError, EngineResult};
use tm_core::{CoreError, Dialect, Direction, FileRepository, Migration};
use tm_db::HistoryRepository;

/// Options for [`Generator::generate`]
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Migration name; spaces become underscores, empty is allowed
    pub name: String,

    /// Number of up/down pairs to create (at least 1)
    pub count: usize,

    /// Report file names only
    pub dry_run: bool,

    /// Write placeholder CREATE/DROP TABLE bodies
    pub fill: bool,

    /// Also start above the highest number recorded in history
    pub after_history: bool,
}

/// Creates new migration pairs in the catalog
pub struct Generator<'a, F: FileRepository> {
    files: &'a F,
    dialect: Dialect,
    history: Option<&'a dyn HistoryRepository>,
}

impl<'a, F: FileRepository> Generator<'a, F> {
    /// Create a generator numbering from the catalog only
    pub fn new(files: &'a F, dialect: Dialect) -> Self {
        Self {
            files,
            dialect,
            history: None,
        }
    }

    /// History consulted when [`GenerateOptions::after_history`] is set
    pub fn with_history(mut self, history: &'a dyn HistoryRepository) -> Self {
        self.history = Some(history);
        self
    }

    /// Generate `count` pairs numbered after the highest existing file.
    ///
    /// Returns the new records (up then down for each number). In a dry run
    /// the records carry the paths they would have, and nothing is written.
    pub fn generate(&self, options: &GenerateOptions) -> EngineResult<Vec<Migration>> {
        if options.count == 0 {
            return Err(CoreError::InvalidCount { count: 0 }.into());
        }
        validate_name(&options.name)?;

        let first = self.next_number(options.after_history)?;
        let last = u32::try_from(options.count)
            .ok()
            .and_then(|c| first.checked_add(c - 1))
            .ok_or_else(|| {
                EngineError::Validation(format!(
                    "cannot allocate {} migration number(s) after {}",
                    options.count,
                    first - 1
                ))
            })?;

        let mut created = Vec::with_capacity(options.count * 2);
        for number in first..=last {
            for direction in [Direction::Up, Direction::Down] {
                let mut migration = Migration::new(number, &options.name, direction);

                if options.dry_run {
                    let path = self.files.migration_path(&migration);
                    log::info!("Dry run: would create {}", path.display());
                    migration.file_path = Some(path);
                } else {
                    self.files.create_file(&mut migration)?;
                    if options.fill {
                        migration.query = self.placeholder(&migration);
                        self.files.write_body(&migration)?;
                    }
                    if let Some(path) = &migration.file_path {
                        log::info!("Created {}", path.display());
                    }
                }
                created.push(migration);
            }
        }

        Ok(created)
    }

    /// First free number: one above the highest file of either direction,
    /// optionally also above everything recorded in history.
    fn next_number(&self, after_history: bool) -> EngineResult<u32> {
        let on_disk = [Direction::Up, Direction::Down]
            .into_iter()
            .map(|d| self.files.list_migrations(d))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .map(|m| m.number)
            .max()
            .unwrap_or(0);

        let recorded = match (after_history, self.history) {
            (true, Some(history)) => history
                .load_all_history()?
                .iter()
                .map(|m| m.number)
                .max()
                .unwrap_or(0),
            _ => 0,
        };

        let highest = on_disk.max(recorded);
        log::debug!("Highest migration number: files {on_disk}, history {recorded}");

        highest
            .checked_add(1)
            .ok_or_else(|| EngineError::Validation("migration numbers exhausted".to_string()))
    }

    fn placeholder(&self, migration: &Migration) -> String {
        let table = placeholder_table(migration);
        match migration.direction {
            Direction::Up => self.dialect.placeholder_create(&table),
            Direction::Down => self.dialect.placeholder_drop(&table),
        }
    }
}

/// Table name used by `--fill`: `table_<number>` plus `_<name>` when named.
///
/// Characters outside `[A-Za-z0-9_]` become `_` so the name is a bare SQL
/// identifier.
pub fn placeholder_table(migration: &Migration) -> String {
    if migration.name.is_empty() {
        return format!("table_{}", migration.number);
    }
    let name: String = migration
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("table_{}_{}", migration.number, name)
}

fn validate_name(name: &str) -> EngineResult<()> {
    let sanitized = tm_core::migration::sanitize_name(name);
    let reason = if sanitized.contains('/') || sanitized.contains('\\') {
        Some("must not contain path separators")
    } else if sanitized.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Some("must not contain tabs, newlines or control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CoreError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
