// src/cli/handlers/feed.rs

use anyhow::{Context, Result};
use std::io::{self, BufRead};

use super::commons;
use crate::{cli::args::RunArgs, models::InteractiveMode};

use clap::Parser;

/// Opens a write-mode session, forwards our stdin line by line and prints
/// the command's captured output once it exits.
pub fn handle(args: Vec<String>) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let mut runner = commons::build_runner(&run_args)?;

    runner.begin_interactive(InteractiveMode::Write)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        writeln!(runner, "{}", line)?;
    }

    let output = runner.eof_expecting(run_args.expect)?;
    commons::print_output(&output);
    Ok(())
}
