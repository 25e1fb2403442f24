// src/models.rs

use crate::errors::ProcessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The operating system family a command line is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsKind {
    Windows,
    Linux,
    Mac,
}

impl OsKind {
    /// Detects the OS this binary was compiled for.
    /// Unix flavours other than macOS are treated as Linux.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Linux
        }
    }

    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }

    /// Delimiter between entries of the search path.
    pub fn path_delimiter(self) -> char {
        if self.is_windows() { ';' } else { ':' }
    }
}

/// Direction of an interactive session. Fixed for the lifetime of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveMode {
    /// We write into the child's stdin; its stdout is captured to a scratch file.
    Write,
    /// We read the child's stdout.
    Read,
}

impl FromStr for InteractiveMode {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" | "write" => Ok(Self::Write),
            "r" | "read" => Ok(Self::Read),
            other => Err(ProcessError::argument(format!(
                "Invalid interactive mode '{}'. Valid values: r, w.",
                other
            ))),
        }
    }
}

impl fmt::Display for InteractiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => write!(f, "w"),
            Self::Read => write!(f, "r"),
        }
    }
}

/// User defaults loaded from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Raise an error when a command exits with an unexpected code.
    pub toss_on_unexpected_exit: bool,
    /// Discard standard error of every command.
    pub redirect_stderr: bool,
    /// Replaces the search path read from the environment.
    pub search_path: Option<String>,
    /// Working directory for commands. `~` and `$VAR` are expanded.
    pub working_directory: Option<String>,
}
