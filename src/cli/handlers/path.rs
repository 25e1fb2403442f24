// src/cli/handlers/path.rs

use anyhow::Result;

use crate::{cli::args::PathArgs, core::paths};

use clap::Parser;

/// Prints the search path, one entry per line.
pub fn handle(args: Vec<String>) -> Result<()> {
    let path_args = PathArgs::try_parse_from(&args)?;
    paths::resolve_search_path(path_args.set.as_deref());

    for entry in paths::search_path_entries() {
        println!("{}", entry);
    }
    Ok(())
}
