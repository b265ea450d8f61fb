// ABOUTME: Entry point for the blue-green CLI application.
// ABOUTME: Parses arguments, loads configuration, and dispatches to command handlers.

mod cli;
mod commands;

use blue_green::config::Config;
use blue_green::error::Result;
use blue_green::output::Output;
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let cli = Cli::parse_from(cli::hoist_global_flags(args));

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output_mode());

    if let Err(e) = run(cli, output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let argv = cli.command.argv();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover_or_default(&env::current_dir()?)?,
    }
    .with_overrides(cli.retain, cli.cf_binary.clone());

    match cli.command {
        Commands::Push { .. } => commands::push(&config, &argv, output).await,
        Commands::Rollback { .. } => commands::rollback(&config, &argv, output).await,
        Commands::Generations { .. } => commands::generations(&config, &argv, output).await,
    }
}
