// src/cli/handlers/run.rs

use anyhow::Result;

use super::commons;
use crate::cli::args::RunArgs;

use clap::Parser;

/// Runs the command to completion and prints everything it wrote to stdout.
pub fn handle(args: Vec<String>) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let runner = commons::build_runner(&run_args)?;

    let output = runner.execute_expecting(run_args.expect)?;
    commons::print_output(&output);
    Ok(())
}
