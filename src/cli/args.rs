// src/cli/args.rs
use clap::Parser;

/// Options shared by every action that runs a command.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct RunArgs {
    /// Working directory for the command. Must be writable.
    #[arg(long)]
    pub cwd: Option<String>,

    /// Expected exit code.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub expect: i32,

    /// Fail when the exit code differs from `--expect`.
    #[arg(long)]
    pub toss: bool,

    /// Discard the command's standard error.
    #[arg(long)]
    pub quiet_stderr: bool,

    /// The command. One word is parsed as a command string; several are taken verbatim.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct ExistsArgs {
    /// Binary to look for. Leading directories are ignored.
    pub name: String,

    /// Search these entries instead of the environment's search path.
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct PathArgs {
    /// Replace the search path before printing it.
    #[arg(long)]
    pub set: Option<String>,
}
