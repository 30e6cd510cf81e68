//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tm_core::HistoryBackend;

/// tidemark - versioned SQL schema migrations
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(
        short = 'p',
        long,
        global = true,
        default_value = ".",
        env = "TIDEMARK_PROJECT_DIR"
    )]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the catalog root folder
    #[arg(long, global = true, env = "TIDEMARK_WORKDIR")]
    pub workdir: Option<String>,

    /// Override the SQL dialect (duckdb, sqlite)
    #[arg(long, global = true, env = "TIDEMARK_DIALECT")]
    pub dialect: Option<String>,

    /// Override the database path (also read from TIDEMARK_DATABASE)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Override the history backend
    #[arg(long, global = true, value_enum, env = "TIDEMARK_HISTORY")]
    pub history: Option<HistoryArg>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create new up/down migration pairs
    Generate(GenerateArgs),

    /// Apply pending migrations
    Up(MigrateArgs),

    /// Roll back applied migrations
    Down(MigrateArgs),

    /// Delete generated migrations that were never applied
    Clean(CleanArgs),

    /// Show the application history
    History(HistoryArgs),

    /// Show where the database stands relative to the catalog
    Status(StatusArgs),

    /// Drop the whole application history
    Purge(PurgeArgs),
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Migration name (spaces become underscores)
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Number of pairs to create
    #[arg(default_value_t = 1)]
    pub count: usize,

    /// Print the file names without creating anything
    #[arg(long)]
    pub dry: bool,

    /// Write placeholder CREATE TABLE / DROP TABLE bodies
    #[arg(long)]
    pub fill: bool,

    /// Also number after everything recorded in history
    #[arg(long)]
    pub after_history: bool,
}

/// Arguments for the up and down commands
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Number of migrations to run (0 = all pending)
    #[arg(default_value_t = 0)]
    pub count: usize,

    /// Show what would run without touching the database
    #[arg(long)]
    pub dry: bool,
}

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Show what would be deleted without deleting
    #[arg(long)]
    pub dry: bool,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the purge command
#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Confirm dropping the history
    #[arg(long)]
    pub yes: bool,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

/// History backend selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryArg {
    /// History table in the target database
    Table,
    /// Log file in the catalog directory
    Log,
}

impl From<HistoryArg> for HistoryBackend {
    fn from(arg: HistoryArg) -> Self {
        match arg {
            HistoryArg::Table => HistoryBackend::Table,
            HistoryArg::Log => HistoryBackend::Log,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
