//! Generate command implementation

use anyhow::{Context, Result};
use tm_engine::{GenerateOptions, Generator};

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::commands::common::{display_path, files_noun};
use crate::context::ProjectContext;

/// Execute the generate command
pub fn execute(args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;

    let options = GenerateOptions {
        name: args.name.clone(),
        count: args.count,
        dry_run: args.dry,
        fill: args.fill,
        after_history: args.after_history,
    };

    // History is only opened when numbering has to look at it
    let history = if args.after_history {
        Some(ctx.open_history()?)
    } else {
        None
    };

    let mut generator = Generator::new(&ctx.files, ctx.config.dialect);
    if let Some(history) = &history {
        generator = generator.with_history(history.as_ref());
    }

    let created = generator
        .generate(&options)
        .context("Failed to generate migrations")?;

    if args.dry {
        println!("Dry run - would create:");
    } else {
        println!("Created:");
    }
    for migration in &created {
        println!("  {}", display_path(migration));
    }
    println!();
    println!(
        "{} {}",
        if args.dry { "Would create" } else { "Created" },
        files_noun(created.len())
    );

    Ok(())
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
