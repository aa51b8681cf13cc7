// envcast - Typed settings from environment overrides
// Copyright (c) 2025 Envcast Contributors
// Licensed under the MIT License

use clap::Parser;
use envcast::cli::{Cli, Commands};
use envcast::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Warnings by default so command output stays readable
    let log_level = cli.log_level.as_deref().unwrap_or("warn");
    let guard = match init_logging(log_level, &cli.logging_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "envcast starting");

    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let options = cli.settings_options();
    match &cli.command {
        Commands::Get(args) => args.execute(options.as_ref()),
        Commands::Show(args) => args.execute(options.as_ref()),
        Commands::Check(args) => args.execute(options.as_ref()),
        Commands::Convert(args) => args.execute(),
        Commands::Init(args) => args.execute(),
    }
}
