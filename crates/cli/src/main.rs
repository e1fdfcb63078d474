//! `bank` entry point.

use std::process::ExitCode;

use bank_cli::{Cli, Config};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Parse arguments and load configuration
    let cli = Cli::parse();
    let config = Config::from_env();

    // 2. Initialize tracing
    if let Err(err) = bank_cli::init_tracing(&config) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    // 3. Run the command against the configured store
    let mut input = std::io::stdin().lock();
    let mut out = std::io::stdout().lock();
    match bank_cli::run(&cli, &config, &mut input, &mut out).await {
        Ok(command) if command.is_success() => ExitCode::SUCCESS,
        Ok(command) => {
            tracing::warn!(command = command.command_name(), "command rolled back");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
