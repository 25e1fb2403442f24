// src/bin/procline.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use procline::{
    ProcessError,
    cli::{Cli, dispatcher},
};

/// The main entry point of the `procline` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // An unexpected exit code is reported and mirrored, like a shell would.
        if let Some(ProcessError::UnexpectedExit { actual, .. }) = e.downcast_ref::<ProcessError>()
        {
            eprintln!("\n{}: {}", "Error".red().bold(), e);
            std::process::exit((*actual).clamp(1, 255));
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    dispatcher::dispatch(&cli.action, cli.args)
}
