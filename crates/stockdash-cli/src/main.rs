mod cli;
mod commands;
mod error;
mod keymap;
mod logging;
mod output;
mod ui;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::logging::LogTarget;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let command = cli.command_or_default();

    let target = match command {
        Command::Tui(_) => LogTarget::File(cli.log_file.clone()),
        Command::Snapshot(_) => LogTarget::Stderr,
    };
    logging::init(&target)?;

    commands::run(&cli, command).await
}
