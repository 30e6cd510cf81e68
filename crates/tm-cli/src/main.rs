//! tidemark CLI - versioned SQL schema migrations

use anyhow::Result;
use clap::Parser;
use tm_core::Direction;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{clean, generate, history, migrate, purge, status};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.global.verbose);

    match &cli.command {
        cli::Commands::Generate(args) => generate::execute(args, &cli.global),
        cli::Commands::Up(args) => migrate::execute(args, &cli.global, Direction::Up),
        cli::Commands::Down(args) => migrate::execute(args, &cli.global, Direction::Down),
        cli::Commands::Clean(args) => clean::execute(args, &cli.global),
        cli::Commands::History(args) => history::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::Purge(args) => purge::execute(args, &cli.global),
    }
}

/// RUST_LOG wins; otherwise `info`, or `debug` with --verbose
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
