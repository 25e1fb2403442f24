// src/cli/handlers/line.rs

use anyhow::Result;

use super::commons;
use crate::cli::args::RunArgs;

use clap::Parser;

/// Prints the exact command line `run` would hand to the shell.
pub fn handle(args: Vec<String>) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let runner = commons::build_runner(&run_args)?;
    println!("{}", runner.command_line()?);
    Ok(())
}
