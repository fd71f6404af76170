//! segreview CLI - terminal front-end for segmentation review sessions.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config;
    let result = match cli.command {
        Commands::Review { dir } => commands::review::run(dir, config, cli.verbose),

        Commands::Rate {
            dir,
            score,
            comment,
            mask,
        } => commands::rate::run(dir, config, score, comment, mask, cli.verbose),

        Commands::Queue { dir, limit, json } => commands::queue::run(dir, config, limit, json),

        Commands::Status { dir, json } => commands::status::run(dir, config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Developer logs go to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "segreview=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
