// src/cli/handlers/exists.rs

use anyhow::{Result, anyhow};
use colored::Colorize;

use crate::{cli::args::ExistsArgs, core::paths};

use clap::Parser;

/// Reports whether a binary is on the search path. Not found is an error,
/// so the exit code can be used in scripts.
pub fn handle(args: Vec<String>) -> Result<()> {
    let exists_args = ExistsArgs::try_parse_from(&args)?;
    if let Some(path) = &exists_args.path {
        paths::resolve_search_path(Some(path));
    }

    if paths::exists(&exists_args.name) {
        println!("{} {}", exists_args.name.cyan(), "found".green());
        Ok(())
    } else {
        Err(anyhow!(
            "'{}' was not found in the search path.",
            exists_args.name
        ))
    }
}
