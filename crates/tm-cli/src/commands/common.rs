//! Shared utilities for CLI commands

use tm_core::Migration;

/// File path shown for a migration, falling back to its file name
pub(crate) fn display_path(migration: &Migration) -> String {
    migration
        .file_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| migration.to_string())
}

/// `"1 migration"` / `"3 migrations"`
pub(crate) fn migrations_noun(count: usize) -> String {
    format!(
        "{} migration{}",
        count,
        if count == 1 { "" } else { "s" }
    )
}

/// `"1 file"` / `"3 files"`
pub(crate) fn files_noun(count: usize) -> String {
    format!("{} file{}", count, if count == 1 { "" } else { "s" })
}

/// Created-at column value
pub(crate) fn created_label(migration: &Migration) -> String {
    migration
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}
