//! Up and down command implementation

use anyhow::Result;
use tm_core::Direction;
use tm_engine::Migrator;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::migrations_noun;
use crate::context::ProjectContext;

/// Execute `up` or `down`
pub fn execute(args: &MigrateArgs, global: &GlobalArgs, direction: Direction) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let history = ctx.open_history()?;
    let migrator = Migrator::new(&ctx.files, history.as_ref());

    let outcome = match direction {
        Direction::Up => migrator.up(args.count, args.dry)?,
        Direction::Down => migrator.down(args.count, args.dry)?,
    };

    if outcome.is_empty() {
        println!("Nothing to do: no pending {} migrations", direction);
        return Ok(());
    }

    let verb = match (direction, outcome.dry_run) {
        (Direction::Up, true) => "Would apply",
        (Direction::Up, false) => "Applied",
        (Direction::Down, true) => "Would roll back",
        (Direction::Down, false) => "Rolled back",
    };

    for migration in &outcome.migrations {
        println!("  {}: {}", verb, migration);
    }
    println!();
    println!(
        "{} {} in {}ms",
        verb,
        migrations_noun(outcome.count()),
        outcome.duration.as_millis()
    );

    Ok(())
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
