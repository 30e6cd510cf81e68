//! Clean command implementation

use anyhow::Result;
use tm_engine::Cleaner;

use crate::cli::{CleanArgs, GlobalArgs};
use crate::commands::common::{display_path, files_noun};
use crate::context::ProjectContext;

/// Execute the clean command
pub fn execute(args: &CleanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let history = ctx.open_history()?;

    let removed = Cleaner::new(&ctx.files, history.as_ref()).clean(args.dry)?;

    if removed.is_empty() {
        println!("Nothing to clean: every migration has been applied");
        return Ok(());
    }

    if args.dry {
        println!("Dry run - would remove the following files:");
    } else {
        println!("Removed:");
    }
    for migration in &removed {
        println!("  {}", display_path(migration));
    }

    println!();
    if args.dry {
        println!("Would clean {}", files_noun(removed.len()));
    } else {
        println!("Cleaned {}", files_noun(removed.len()));
    }

    Ok(())
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
