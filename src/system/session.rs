// src/system/session.rs

use crate::{
    constants::WRITE_LOG_PREVIEW,
    errors::{ProcessError, Result},
    models::InteractiveMode,
    system::{
        executor::{self, check_exit_code, decode_output, exit_code},
        fs::{CaptureFile, Directory},
        workdir::DirectoryLease,
    },
};
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Stdio};

/// A running child process connected through one pipe.
///
/// In write mode we hold the child's stdin and its stdout goes to a capture
/// file; in read mode we hold its stdout. The session owns its directory
/// lease, so closing or dropping it returns to the prior directory when the
/// session had moved the process.
#[derive(Debug)]
pub struct InteractiveSession {
    command_line: String,
    mode: InteractiveMode,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    finished: bool,
    capture: Option<CaptureFile>,
    lease: Option<DirectoryLease>,
}

impl InteractiveSession {
    /// Spawns `command_line` through the shell.
    ///
    /// `capture` must be the file the command line redirects stdout into when
    /// `mode` is `Write`, and `None` otherwise.
    pub fn open(
        command_line: String,
        mode: InteractiveMode,
        cwd: &Directory,
        capture: Option<CaptureFile>,
        lease: DirectoryLease,
    ) -> Result<Self> {
        log::debug!("Executing ({}): {}", mode, command_line);

        let mut command = executor::shell_command(&command_line, cwd.path());
        command.stderr(Stdio::inherit());
        match mode {
            InteractiveMode::Write => {
                command.stdin(Stdio::piped()).stdout(Stdio::inherit());
            }
            InteractiveMode::Read => {
                command.stdin(Stdio::null()).stdout(Stdio::piped());
            }
        }

        let mut child = command.spawn().map_err(|e| ProcessError::Spawn {
            command: command_line.clone(),
            source: e,
        })?;
        let stdin = child.stdin.take();
        let stdout = child.stdout.take().map(BufReader::new);

        Ok(Self {
            command_line,
            mode,
            child,
            stdin,
            stdout,
            finished: false,
            capture,
            lease: Some(lease),
        })
    }

    pub fn mode(&self) -> InteractiveMode {
        self.mode
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Directory that will be restored when the session ends.
    pub fn prior_directory(&self) -> Option<&Directory> {
        self.lease.as_ref().map(DirectoryLease::prior)
    }

    /// Writes `data` to the child's stdin and flushes it.
    pub fn write(&mut self, data: &str) -> Result<usize> {
        if data.is_empty() {
            return Err(ProcessError::Write(
                "Could not write to handle or string was zero length.".to_string(),
            ));
        }
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            ProcessError::invalid_state("Attempted to write to non-writable handle.")
        })?;

        let preview: String = data.chars().take(WRITE_LOG_PREVIEW).collect();
        log::debug!("Writing {}... to handle.", preview);

        stdin
            .write_all(data.as_bytes())
            .and_then(|()| stdin.flush())
            .map_err(|e| ProcessError::Write(e.to_string()))?;
        Ok(data.len())
    }

    /// Next line of the child's stdout without its line terminator, or
    /// `None` once the child closed it.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let stdout = self.stdout.as_mut().ok_or_else(|| {
            ProcessError::invalid_state("Attempted to read from non-readable handle.")
        })?;

        let mut buf = Vec::new();
        if stdout.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(decode_output(buf)))
    }

    /// Closes the pipe, waits for the child and returns the session output:
    /// the capture file contents in write mode, the unread stdout in read mode.
    ///
    /// The capture file is deleted and the prior directory restored before any
    /// error is returned.
    pub fn close(mut self, expected: i32, toss: bool) -> Result<String> {
        drop(self.stdin.take());
        let unread = self.stdout.take().map(|mut reader| {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).map(|_| bytes)
        });

        let status = self.child.wait();
        self.finished = true;

        let captured = self.capture.take().map(|capture| {
            let contents = capture.read();
            let deleted = capture.delete();
            contents.and_then(|text| deleted.map(|()| text))
        });
        let restored = match self.lease.take() {
            Some(lease) => lease.release(),
            None => Ok(()),
        };

        let actual = exit_code(status?);
        check_exit_code(&self.command_line, expected, actual, toss)?;

        let output = match (captured, unread) {
            (Some(captured), _) => captured?,
            (None, Some(unread)) => decode_output(unread?),
            (None, None) => String::new(),
        };
        restored?;
        Ok(output)
    }
}

impl Drop for InteractiveSession {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        log::warn!(
            "Interactive session for '{}' dropped without EOF; waiting for it to exit.",
            self.command_line
        );
        drop(self.stdin.take());
        drop(self.stdout.take());
        if let Err(e) = self.child.wait() {
            log::warn!("Failed to wait for child process {}: {}", self.child.id(), e);
        }
    }
}
