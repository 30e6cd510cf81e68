//! Status command implementation

use anyhow::Result;
use tm_engine::{Migrator, Position, Status};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::migrations_noun;
use crate::context::ProjectContext;

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let history = ctx.open_history()?;
    let status = Migrator::new(&ctx.files, history.as_ref()).status()?;

    match args.output {
        OutputFormat::Table => print_status(&status),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
    }
    Ok(())
}

/// One-line description of a position
pub(crate) fn describe(position: &Position) -> String {
    match position {
        Position::Empty => "empty: no migrations applied yet".to_string(),
        Position::Synced => "synced: every migration is applied".to_string(),
        Position::Behind { pending } => format!("behind: {} pending", migrations_noun(*pending)),
        Position::PartiallyRolledBack { number } => {
            format!("partially rolled back: {:06} was rolled back last", number)
        }
    }
}

fn print_status(status: &Status) {
    println!("State:        {}", describe(&status.position));
    match &status.last_applied {
        Some(m) => println!("Last applied: {}", m),
        None => println!("Last applied: -"),
    }
    if status.pending.is_empty() {
        println!("Pending:      none");
    } else {
        println!("Pending:");
        for m in &status.pending {
            println!("  {}", m);
        }
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
