//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::PathBuf;
use tm_core::{Config, Dialect, FsRepository, HistoryBackend};
use tm_db::{DuckDbBackend, HistoryRepository, LogFileHistory, SqlExecutor, SqliteBackend};

use crate::cli::GlobalArgs;

/// Resolved project: configuration plus the catalog it points at
pub struct ProjectContext {
    /// Project root directory
    pub root: PathBuf,

    /// Effective configuration (file, env and flags merged)
    pub config: Config,

    /// Catalog repository for the configured dialect
    pub files: FsRepository,

    /// Database path after `--database` / `TIDEMARK_DATABASE` resolution
    pub database: String,
}

impl ProjectContext {
    /// Load configuration and apply global overrides. Opens no database.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let root = global.project_dir.clone();

        let mut config = match &global.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => Config::discover(&root).context("Failed to load project configuration")?,
        };

        if let Some(workdir) = &global.workdir {
            config.workdir = workdir.clone();
        }
        if let Some(dialect) = &global.dialect {
            config.dialect = dialect.parse().context("Invalid --dialect")?;
        }
        if let Some(history) = global.history {
            config.history.backend = history.into();
        }
        config.validate().context("Invalid configuration")?;

        let database = Config::resolve_database(global.database.as_deref())
            .unwrap_or_else(|| config.database_path(&root));

        let files = FsRepository::new(config.migrations_dir(&root), config.dialect.extension());

        log::debug!(
            "Project {}: dialect {}, catalog {}, history {}",
            root.display(),
            config.dialect,
            config.migrations_dir(&root).display(),
            config.history.backend
        );

        Ok(Self {
            root,
            config,
            files,
            database,
        })
    }

    /// Open the configured history backend.
    ///
    /// The returned handle owns the database connection; it is closed when
    /// dropped.
    pub fn open_history(&self) -> Result<Box<dyn HistoryRepository>> {
        let table = &self.config.history.table;
        let history: Box<dyn HistoryRepository> = match self.config.history.backend {
            HistoryBackend::Table => match self.config.dialect {
                Dialect::DuckDb => Box::new(self.open_duckdb(table)?),
                Dialect::Sqlite => Box::new(self.open_sqlite(table)?),
            },
            HistoryBackend::Log => Box::new(LogFileHistory::new(
                self.config.log_file_path(&self.root),
                self.open_executor()?,
            )),
        };
        log::debug!("Using {} history", history.backend_name());
        Ok(history)
    }

    fn open_executor(&self) -> Result<Box<dyn SqlExecutor>> {
        let table = &self.config.history.table;
        Ok(match self.config.dialect {
            Dialect::DuckDb => Box::new(self.open_duckdb(table)?),
            Dialect::Sqlite => Box::new(self.open_sqlite(table)?),
        })
    }

    fn open_duckdb(&self, table: &str) -> Result<DuckDbBackend> {
        DuckDbBackend::new(&self.database, table)
            .with_context(|| format!("Failed to connect to database {}", self.database))
    }

    fn open_sqlite(&self, table: &str) -> Result<SqliteBackend> {
        SqliteBackend::new(&self.database, table)
            .with_context(|| format!("Failed to connect to database {}", self.database))
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
