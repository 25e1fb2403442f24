// src/errors.rs

use thiserror::Error;

/// Errors raised while building, running or driving an external process.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Malformed tokenizer input or an invalid interactive mode.
    #[error("Invalid argument: {0}")]
    Argument(String),
    /// An operation was invoked in the wrong session state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// The environment does not allow the operation (e.g. a working directory that is not writable).
    #[error("Environment error: {0}")]
    Environment(String),
    /// The process exited with a code other than the expected one.
    #[error("Command '{command}' returned {actual}, expected {expected}.")]
    UnexpectedExit {
        command: String,
        expected: i32,
        actual: i32,
    },
    /// Writing to an interactive session failed or wrote nothing.
    #[error("Could not write to session: {0}")]
    Write(String),
    /// The shell could not be launched for a command line.
    #[error("Command '{command}' could not be executed: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used across the library.
pub type Result<T, E = ProcessError> = std::result::Result<T, E>;

impl ProcessError {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub(crate) fn environment(message: impl Into<String>) -> Self {
        Self::Environment(message.into())
    }
}
