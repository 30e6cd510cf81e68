//! Purge command implementation

use anyhow::{bail, Result};
use tm_engine::Migrator;

use crate::cli::{GlobalArgs, PurgeArgs};
use crate::context::ProjectContext;

/// Execute the purge command
pub fn execute(args: &PurgeArgs, global: &GlobalArgs) -> Result<()> {
    if !args.yes {
        bail!("Refusing to purge the migration history without --yes");
    }

    let ctx = ProjectContext::load(global)?;
    let history = ctx.open_history()?;
    Migrator::new(&ctx.files, history.as_ref()).purge()?;

    println!(
        "Purged {} history (catalog files were left in place)",
        history.backend_name()
    );
    Ok(())
}

#[cfg(test)]
#[path = "purge_test.rs"]
mod tests;
