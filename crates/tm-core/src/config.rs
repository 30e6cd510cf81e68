//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file names searched in the project directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["tidemark.yml", "tidemark.yaml"];

/// Environment variable that overrides the configured database path
pub const DATABASE_ENV_VAR: &str = "TIDEMARK_DATABASE";

/// Project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root folder of the migration catalog, relative to the project
    #[serde(default = "default_workdir")]
    pub workdir: String,

    /// Target database engine
    #[serde(default)]
    pub dialect: Dialect,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Where the application history is kept
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database file path (or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// History storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Storage backend for history entries
    #[serde(default)]
    pub backend: HistoryBackend,

    /// Table name used by the `table` backend
    #[serde(default = "default_history_table")]
    pub table: String,

    /// File name (inside the catalog directory) used by the `log` backend
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::default(),
            table: default_history_table(),
            log_file: default_log_file(),
        }
    }
}

/// SQL dialect of the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// SQLite
    Sqlite,
}

impl Dialect {
    /// File extension of catalog files for this dialect
    pub fn extension(&self) -> &'static str {
        match self {
            Dialect::DuckDb => "sql",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Subdirectory of the workdir holding this dialect's catalog
    pub fn subdirectory(&self) -> &'static str {
        match self {
            Dialect::DuckDb => "duckdb",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Placeholder `CREATE TABLE` written by `generate --fill`
    pub fn placeholder_create(&self, table: &str) -> String {
        match self {
            Dialect::DuckDb => format!(
                "CREATE TABLE {} (\n    id INTEGER PRIMARY KEY,\n    created TIMESTAMP DEFAULT current_timestamp\n);\n",
                table
            ),
            Dialect::Sqlite => format!(
                "CREATE TABLE {} (\n    id INTEGER PRIMARY KEY AUTOINCREMENT,\n    created DATETIME DEFAULT CURRENT_TIMESTAMP\n);\n",
                table
            ),
        }
    }

    /// Placeholder `DROP TABLE` matching [`Dialect::placeholder_create`]
    pub fn placeholder_drop(&self, table: &str) -> String {
        format!("DROP TABLE {};\n", table)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::DuckDb => write!(f, "duckdb"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "duckdb" => Ok(Dialect::DuckDb),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(CoreError::ConfigInvalid {
                message: format!("unknown dialect '{}' (expected duckdb or sqlite)", other),
            }),
        }
    }
}

/// History storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    /// History table inside the target database (default)
    #[default]
    Table,
    /// Append-only log file in the catalog directory
    Log,
}

impl fmt::Display for HistoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryBackend::Table => write!(f, "table"),
            HistoryBackend::Log => write!(f, "log"),
        }
    }
}

fn default_workdir() -> String {
    "migrations".to_string()
}

fn default_db_path() -> String {
    "tidemark.duckdb".to_string()
}

fn default_history_table() -> String {
    "tidemark_history".to_string()
}

fn default_log_file() -> String {
    ".tidemark-log".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            dialect: Dialect::default(),
            database: DatabaseConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Like [`Config::load_from_dir`], but falls back to defaults when the
    /// project has no config file.
    pub fn discover(dir: &Path) -> CoreResult<Self> {
        match Self::load_from_dir(dir) {
            Err(CoreError::ConfigNotFound { .. }) => {
                log::debug!("No config file in {}, using defaults", dir.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.workdir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "workdir cannot be empty".to_string(),
            });
        }

        if !is_identifier(&self.history.table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "history table '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                    self.history.table
                ),
            });
        }

        let log_file = &self.history.log_file;
        if log_file.is_empty() || log_file.contains('/') || log_file.contains('\\') {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "history log_file '{}' must be a plain file name",
                    log_file
                ),
            });
        }

        Ok(())
    }

    /// Catalog directory: `<root>/<workdir>/<dialect subdirectory>`
    pub fn migrations_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.workdir).join(self.dialect.subdirectory())
    }

    /// Absolute path of the history log file
    pub fn log_file_path(&self, root: &Path) -> PathBuf {
        self.migrations_dir(root).join(&self.history.log_file)
    }

    /// Database path resolved against the project root.
    ///
    /// `:memory:` is passed through untouched.
    pub fn database_path(&self, root: &Path) -> String {
        if self.database.path == ":memory:" {
            return self.database.path.clone();
        }
        let path = Path::new(&self.database.path);
        if path.is_absolute() {
            self.database.path.clone()
        } else {
            root.join(path).display().to_string()
        }
    }

    /// Resolve the database path from a CLI flag or the TIDEMARK_DATABASE
    /// environment variable
    ///
    /// Priority: CLI flag > TIDEMARK_DATABASE env var > None
    pub fn resolve_database(cli_database: Option<&str>) -> Option<String> {
        cli_database
            .map(String::from)
            .or_else(|| std::env::var(DATABASE_ENV_VAR).ok())
            .filter(|s| !s.is_empty())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
