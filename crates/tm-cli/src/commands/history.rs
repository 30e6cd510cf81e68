//! History command implementation

use anyhow::Result;
use serde::Serialize;
use tm_core::Migration;
use tm_engine::Migrator;

use crate::cli::{GlobalArgs, HistoryArgs, OutputFormat};
use crate::commands::common::created_label;
use crate::context::ProjectContext;

/// One history entry for display
#[derive(Debug, Serialize)]
struct HistoryEntry {
    number: u32,
    name: String,
    direction: String,
    created: Option<String>,
}

impl From<&Migration> for HistoryEntry {
    fn from(m: &Migration) -> Self {
        Self {
            number: m.number,
            name: m.name.clone(),
            direction: m.direction.to_string(),
            created: m.created_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Execute the history command
pub fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let history = ctx.open_history()?;
    let entries = Migrator::new(&ctx.files, history.as_ref()).history()?;

    match args.output {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
    }
    Ok(())
}

/// Print history in table format
fn print_table(entries: &[Migration]) {
    if entries.is_empty() {
        println!("No migrations have been applied");
        return;
    }

    let name_width = entries
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    println!(
        "{:<6}  {:<name_width$}  {:<9}  CREATED",
        "NUMBER",
        "NAME",
        "DIRECTION",
        name_width = name_width
    );
    println!(
        "{:-<6}  {:-<name_width$}  {:-<9}  {}",
        "",
        "",
        "",
        "-".repeat(19),
        name_width = name_width
    );

    for m in entries {
        let name = if m.name.is_empty() { "-" } else { m.name.as_str() };
        println!(
            "{:06}  {:<name_width$}  {:<9}  {}",
            m.number,
            name,
            m.direction,
            created_label(m),
            name_width = name_width
        );
    }

    println!();
    println!("{} entries", entries.len());
}

/// Print history as JSON
fn print_json(entries: &[Migration]) -> Result<()> {
    let rows: Vec<HistoryEntry> = entries.iter().map(HistoryEntry::from).collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
