// src/cli/handlers/commons.rs

// Shared functions used by the handlers that run a command.

use anyhow::{Context, Result, anyhow};

use crate::{cli::args::RunArgs, core::config_loader, runner::ProcessRunner};

/// Builds a runner from the CLI options, layered over the user's config file.
///
/// A single command word is parsed as a command string; several words are
/// taken as pre-split arguments.
pub fn build_runner(args: &RunArgs) -> Result<ProcessRunner> {
    let mut runner = match args.command.as_slice() {
        [] => return Err(anyhow!("No command given.")),
        [single] => ProcessRunner::parse(single)
            .with_context(|| format!("Could not parse command '{}'", single))?,
        parts => ProcessRunner::from_args(parts)?,
    };

    let config = config_loader::load_config()?;
    runner.apply_config(&config)?;

    if let Some(cwd) = &args.cwd {
        runner.set_working_directory(cwd)?;
    }
    if args.toss {
        runner.toss_if_unexpected();
    }
    if args.quiet_stderr {
        runner.redirect_stderr(true)?;
    }

    log::debug!("Runner prepared: {:?}", runner);
    Ok(runner)
}

/// Prints session or command output without adding a second trailing newline.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}
