use clap::Parser;

pub mod args;
pub mod dispatcher;
pub mod handlers;

/// procline: run external commands with shell-safe quoting.
///
/// Actions:
///   run    [options] -- <command...>   Run a command and print its output.
///   feed   [options] -- <command...>   Pipe stdin into a command, print what it wrote.
///   read   [options] -- <command...>   Stream a command's output line by line.
///   line   [options] -- <command...>   Print the escaped command line without running it.
///   exists <name> [--path P]           Check whether a binary is on the search path.
///   path   [--set P]                   Print the search path entries.
///
/// A single quoted <command> is split like a shell would ('a b' stays one
/// argument); several words are taken as pre-split arguments.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The action to perform.
    pub action: String,

    /// Arguments for the action, passed through untouched.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
