//! rulegen CLI - Converts resolved Soong modules into Bazel target rules

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::GlobalOpts;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging; stdout is reserved for generated output
    let filter = if cli.verbose {
        EnvFilter::new("rulegen=debug")
    } else {
        EnvFilter::new("rulegen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let opts = GlobalOpts {
        color: !cli.no_color && std::io::stderr().is_terminal(),
        config: cli.config,
    };

    // Execute command
    match cli.command {
        Commands::Convert(args) => commands::convert::execute(args, &opts),
        Commands::Check(args) => commands::check::execute(args, &opts),
        Commands::Packages(args) => commands::packages::execute(args, &opts),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
