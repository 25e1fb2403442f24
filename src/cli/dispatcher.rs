use anyhow::{Result, anyhow};

use crate::cli::handlers;

// --- Command Definition and Registry ---

/// Defines a CLI action, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
}

/// The single source of truth for all actions.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "exists",
        aliases: &["which"],
        handler: handlers::exists::handle,
    },
    CommandDefinition {
        name: "feed",
        aliases: &["write"],
        handler: handlers::feed::handle,
    },
    CommandDefinition {
        name: "line",
        aliases: &["show"],
        handler: handlers::line::handle,
    },
    CommandDefinition {
        name: "path",
        aliases: &[],
        handler: handlers::path::handle,
    },
    CommandDefinition {
        name: "read",
        aliases: &[],
        handler: handlers::read::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &["exec"],
        handler: handlers::run::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes an action and its arguments to the matching handler.
pub fn dispatch(action: &str, args: Vec<String>) -> Result<()> {
    let command = find_command(action).ok_or_else(|| {
        let known: Vec<&str> = COMMAND_REGISTRY.iter().map(|cmd| cmd.name).collect();
        anyhow!(
            "Unknown action '{}'. Available actions: {}.",
            action,
            known.join(", ")
        )
    })?;
    log::debug!("Dispatching '{}' with args {:?}", command.name, args);
    (command.handler)(args)
}
