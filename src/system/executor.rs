// src/system/executor.rs

use crate::errors::{ProcessError, Result};
use std::path::Path;
use std::process::{Command as StdCommand, ExitStatus, Stdio};

/// Wraps a rendered command line in the platform shell (`sh -c` or `cmd /C`).
///
/// The command line carries its own quoting and redirections, so it is handed
/// to the shell as a single, untouched string.
pub fn shell_command(command_line: &str, cwd: &Path) -> StdCommand {
    let mut command = platform_shell(command_line);
    command.current_dir(dunce::simplified(cwd));
    command
}

#[cfg(windows)]
fn platform_shell(command_line: &str) -> StdCommand {
    use std::os::windows::process::CommandExt;

    let mut command = StdCommand::new("cmd");
    command.arg("/C").raw_arg(command_line);
    command
}

#[cfg(not(windows))]
fn platform_shell(command_line: &str) -> StdCommand {
    let mut command = StdCommand::new("sh");
    command.arg("-c").arg(command_line);
    command
}

/// The OS-native exit code. On Unix a child killed by a signal reports `128 + signal`,
/// the way shells do.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

/// Applies the toss policy: a mismatch is only an error when `toss` is set.
pub fn check_exit_code(command_line: &str, expected: i32, actual: i32, toss: bool) -> Result<()> {
    if actual == expected {
        return Ok(());
    }
    if toss {
        return Err(ProcessError::UnexpectedExit {
            command: command_line.to_string(),
            expected,
            actual,
        });
    }
    log::debug!(
        "Command '{}' returned {} (expected {}), ignoring.",
        command_line,
        actual,
        expected
    );
    Ok(())
}

/// Runs a command line to completion and returns its standard output,
/// one line per captured line, joined with `\n`.
/// Stderr is passed through to the user's terminal unless the command line redirects it.
pub fn execute_and_capture_output(
    command_line: &str,
    cwd: &Path,
    expected: i32,
    toss: bool,
) -> Result<String> {
    log::debug!("Executing: {}", command_line);

    let command_output = shell_command(command_line, cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| ProcessError::Spawn {
            command: command_line.to_string(),
            source: e,
        })?;

    let actual = exit_code(command_output.status);
    check_exit_code(command_line, expected, actual, toss)?;

    let stdout = decode_output(command_output.stdout);
    Ok(stdout.lines().collect::<Vec<_>>().join("\n"))
}

/// Decodes child output, replacing invalid UTF-8 sequences with U+FFFD.
pub(crate) fn decode_output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| {
        log::debug!("Output was not valid UTF-8; invalid sequences replaced.");
        String::from_utf8_lossy(e.as_bytes()).into_owned()
    })
}
