// src/cli/handlers/read.rs

use anyhow::Result;

use super::commons;
use crate::{cli::args::RunArgs, models::InteractiveMode};

use clap::Parser;

/// Opens a read-mode session and prints each line as soon as the command writes it.
pub fn handle(args: Vec<String>) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let mut runner = commons::build_runner(&run_args)?;

    runner.begin_interactive(InteractiveMode::Read)?;
    while let Some(line) = runner.read_line()? {
        println!("{}", line);
    }

    let rest = runner.eof_expecting(run_args.expect)?;
    commons::print_output(&rest);
    Ok(())
}
