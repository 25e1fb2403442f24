// src/core/command_line.rs

use crate::{
    constants::{POSIX_NULL_REDIRECT, WINDOWS_NULL_REDIRECT},
    errors::{ProcessError, Result},
    models::OsKind,
};
use std::path::Path;

/// Everything needed to render one command line.
#[derive(Debug, Clone, Copy)]
pub struct CommandLineParts<'a> {
    pub program: &'a str,
    pub arguments: &'a [String],
    pub redirect_stderr: bool,
    /// Set only for write-mode sessions: stdout is redirected into this file.
    pub capture_path: Option<&'a Path>,
    pub os: OsKind,
}

/// Flags, pipes and backtick substitutions are passed to the shell untouched.
/// The caller is responsible for their safety.
pub fn is_verbatim(token: &str) -> bool {
    token.starts_with('-') || token.starts_with('|') || token.starts_with('`')
}

/// Renders the full command line:
/// `<program> <arg1> ... [2>/dev/null|2>nul] [> <capture file>]`.
pub fn assemble(parts: &CommandLineParts<'_>) -> Result<String> {
    let mut segments = Vec::with_capacity(parts.arguments.len() + 4);
    segments.push(parts.program.to_string());

    for argument in parts.arguments {
        if is_verbatim(argument) {
            segments.push(argument.clone());
        } else {
            segments.push(quote_argument(argument, parts.os)?);
        }
    }

    if parts.redirect_stderr {
        let sink = if parts.os.is_windows() {
            WINDOWS_NULL_REDIRECT
        } else {
            POSIX_NULL_REDIRECT
        };
        segments.push(sink.to_string());
    }

    if let Some(capture) = parts.capture_path {
        let capture = capture.to_str().ok_or_else(|| {
            ProcessError::environment(format!(
                "Capture file path '{}' is not valid UTF-8.",
                capture.display()
            ))
        })?;
        segments.push(">".to_string());
        segments.push(quote_argument(capture, parts.os)?);
    }

    Ok(segments.join(" "))
}

/// Escapes a single argument so the shell sees it as one literal word.
pub fn quote_argument(argument: &str, os: OsKind) -> Result<String> {
    if os.is_windows() {
        quote_for_cmd(argument)
    } else {
        shlex::try_quote(argument)
            .map(|quoted| quoted.into_owned())
            .map_err(|e| ProcessError::argument(format!("Cannot quote '{}': {}", argument, e)))
    }
}

/// `cmd.exe` has no reliable escape for `"`, `%` and `!` inside a quoted
/// word, so they are blanked out before wrapping in double quotes.
fn quote_for_cmd(argument: &str) -> Result<String> {
    if argument.contains('\0') {
        return Err(ProcessError::argument(format!(
            "Cannot quote '{}': contains a NUL byte",
            argument.escape_debug()
        )));
    }
    let cleaned: String = argument
        .chars()
        .map(|c| match c {
            '"' | '%' | '!' => ' ',
            other => other,
        })
        .collect();
    Ok(format!("\"{}\"", cleaned))
}
