// src/runner.rs

use crate::{
    core::{
        arg_parser::{self, ParsedCommand},
        command_line::{self, CommandLineParts},
        paths,
    },
    errors::{ProcessError, Result},
    models::{InteractiveMode, OsKind, RunnerConfig},
    system::{
        executor,
        fs::{CaptureFile, Directory},
        session::InteractiveSession,
        workdir::{self, DirectoryLease},
    },
};
use std::fmt;
use std::path::Path;

/// One external command: its program, arguments, working directory and
/// exit-code policy, run either synchronously or as an interactive session.
///
/// ```no_run
/// use procline::{InteractiveMode, ProcessRunner};
///
/// # fn main() -> procline::Result<()> {
/// let listing = ProcessRunner::parse("ls -la 'My Documents'")?.execute()?;
///
/// let mut sort = ProcessRunner::parse("sort -r")?;
/// sort.begin_interactive(InteractiveMode::Write)?;
/// write!(sort, "{}\n{}\n", "a", "b")?;
/// assert_eq!(sort.eof()?, "b\na\n");
/// # let _ = listing;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProcessRunner {
    program: String,
    arguments: Vec<String>,
    working_directory: Directory,
    toss_on_unexpected_exit: bool,
    redirect_stderr: bool,
    session: Option<InteractiveSession>,
    os: OsKind,
}

impl ProcessRunner {
    /// Builds a runner from a single command string. The first word is the
    /// program; `"..."`, `'...'` and `` `...` `` spans become single arguments.
    pub fn parse(command: &str) -> Result<Self> {
        let os = OsKind::current();
        Self::from_parsed(arg_parser::parse_command(command, os)?, os)
    }

    /// Builds a runner from pre-split parts (program first). Parts are never split again.
    pub fn from_args<S: AsRef<str>>(parts: &[S]) -> Result<Self> {
        let os = OsKind::current();
        Self::from_parsed(arg_parser::from_parts(parts, os)?, os)
    }

    fn from_parsed(parsed: ParsedCommand, os: OsKind) -> Result<Self> {
        Ok(Self {
            program: parsed.program,
            arguments: parsed.arguments,
            working_directory: Directory::current()?,
            toss_on_unexpected_exit: false,
            redirect_stderr: false,
            session: None,
            os,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn working_directory(&self) -> &Directory {
        &self.working_directory
    }

    /// The directory that `eof` returns to, while a session is open.
    pub fn prior_directory(&self) -> Option<&Directory> {
        self.session
            .as_ref()
            .and_then(InteractiveSession::prior_directory)
    }

    pub fn is_interactive(&self) -> bool {
        self.session.is_some()
    }

    pub fn interactive_mode(&self) -> Option<InteractiveMode> {
        self.session.as_ref().map(InteractiveSession::mode)
    }

    pub fn tosses_on_unexpected_exit(&self) -> bool {
        self.toss_on_unexpected_exit
    }

    fn ensure_idle(&self, action: &str) -> Result<()> {
        if self.session.is_some() {
            return Err(ProcessError::invalid_state(format!(
                "Attempted to {} while an interactive session is running.",
                action
            )));
        }
        Ok(())
    }

    /// Appends arguments. The text is split on spaces and quoted spans are grouped,
    /// exactly like the command string given to [`ProcessRunner::parse`].
    pub fn add_argument(&mut self, text: &str) -> Result<&mut Self> {
        self.ensure_idle("add arguments")?;
        let mut tokens = arg_parser::split_arguments(text)?;
        self.arguments.append(&mut tokens);
        Ok(self)
    }

    /// Appends several argument strings, each split like [`ProcessRunner::add_argument`].
    pub fn add_arguments<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<&mut Self> {
        let joined = texts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        self.add_argument(&joined)
    }

    /// Appends one complete token, untouched.
    pub fn add_raw_argument(&mut self, token: impl Into<String>) -> Result<&mut Self> {
        self.ensure_idle("add arguments")?;
        let token = token.into();
        if token.is_empty() {
            return Err(ProcessError::argument("Arguments cannot be empty strings."));
        }
        self.arguments.push(token);
        Ok(self)
    }

    /// Moves the process into `path` and runs commands there.
    ///
    /// Fails with an environment error, leaving everything unchanged, when the
    /// directory is not writable (or does not exist).
    pub fn set_working_directory(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.ensure_idle("change the working directory")?;
        let dir = Directory::new(path)?;
        if !dir.is_writable() {
            return Err(ProcessError::environment(format!(
                "Working directory {} is not writable.",
                dir.path().display()
            )));
        }
        workdir::change_directory_exclusive(&dir)?;
        self.working_directory = dir;
        Ok(self)
    }

    /// Raise [`ProcessError::UnexpectedExit`] when the exit code does not match.
    pub fn toss_if_unexpected(&mut self) -> &mut Self {
        self.set_toss_on_unexpected_exit(true)
    }

    pub fn set_toss_on_unexpected_exit(&mut self, toss: bool) -> &mut Self {
        self.toss_on_unexpected_exit = toss;
        self
    }

    /// Discard the command's standard error.
    pub fn redirect_standard_error(&mut self, enabled: bool) -> Result<&mut Self> {
        self.ensure_idle("change stderr redirection")?;
        self.redirect_stderr = enabled;
        Ok(self)
    }

    /// Alias for [`ProcessRunner::redirect_standard_error`].
    pub fn redirect_stderr(&mut self, enabled: bool) -> Result<&mut Self> {
        self.redirect_standard_error(enabled)
    }

    /// Applies user defaults. Flags set in the config are switched on, never off.
    pub fn apply_config(&mut self, config: &RunnerConfig) -> Result<&mut Self> {
        self.ensure_idle("apply configuration")?;
        if config.toss_on_unexpected_exit {
            self.toss_on_unexpected_exit = true;
        }
        if config.redirect_stderr {
            self.redirect_stderr = true;
        }
        if let Some(search_path) = &config.search_path {
            paths::resolve_search_path(Some(search_path));
        }
        if let Some(template) = &config.working_directory {
            let expanded = shellexpand::full(template).map_err(|e| {
                ProcessError::environment(format!(
                    "Failed to expand working directory '{}': {}",
                    template, e
                ))
            })?;
            self.set_working_directory(expanded.into_owned())?;
        }
        Ok(self)
    }

    fn render(&self, capture_path: Option<&Path>) -> Result<String> {
        command_line::assemble(&CommandLineParts {
            program: &self.program,
            arguments: &self.arguments,
            redirect_stderr: self.redirect_stderr,
            capture_path,
            os: self.os,
        })
    }

    /// The escaped command line `execute` hands to the shell.
    pub fn command_line(&self) -> Result<String> {
        self.render(None)
    }

    /// Runs the command to completion and returns its output; exit code 0 is expected.
    pub fn execute(&self) -> Result<String> {
        self.execute_expecting(0)
    }

    /// Runs the command to completion, expecting `expected` as exit code.
    pub fn execute_expecting(&self, expected: i32) -> Result<String> {
        self.ensure_idle("execute synchronously")?;
        let line = self.command_line()?;
        executor::execute_and_capture_output(
            &line,
            self.working_directory.path(),
            expected,
            self.toss_on_unexpected_exit,
        )
    }

    /// Starts an interactive session.
    ///
    /// In write mode the child's stdout is redirected into a scratch file in
    /// the working directory; `eof` returns its contents.
    pub fn begin_interactive(&mut self, mode: InteractiveMode) -> Result<&mut Self> {
        if self.session.is_some() {
            return Err(ProcessError::invalid_state(
                "Attempted to open an interactive session when there is already one active.",
            ));
        }

        let lease = DirectoryLease::acquire(&self.working_directory)?;
        let capture = match mode {
            InteractiveMode::Write => Some(CaptureFile::create_in(&self.working_directory)?),
            InteractiveMode::Read => None,
        };
        let line = self.render(capture.as_ref().map(CaptureFile::path))?;

        self.session = Some(InteractiveSession::open(
            line,
            mode,
            &self.working_directory,
            capture,
            lease,
        )?);
        Ok(self)
    }

    fn writable_session(&mut self) -> Result<&mut InteractiveSession> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| ProcessError::invalid_state("Attempted to write to non-existent handle."))?;
        if session.mode() != InteractiveMode::Write {
            return Err(ProcessError::invalid_state(
                "Attempted to write to non-writable handle.",
            ));
        }
        Ok(session)
    }

    /// Writes text to a write-mode session.
    pub fn write_str(&mut self, data: &str) -> Result<&mut Self> {
        self.writable_session()?.write(data)?;
        Ok(self)
    }

    /// Formats and writes to a write-mode session; this is what `write!` calls.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<&mut Self> {
        let data = args.to_string();
        self.write_str(&data)
    }

    /// Reads the next stdout line of a read-mode session.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| ProcessError::invalid_state("Attempted to read from non-existent handle."))?;
        if session.mode() != InteractiveMode::Read {
            return Err(ProcessError::invalid_state(
                "Attempted to read from non-readable handle.",
            ));
        }
        session.read_line()
    }

    /// Ends the session expecting exit code 0. See [`ProcessRunner::eof_expecting`].
    pub fn eof(&mut self) -> Result<String> {
        self.eof_expecting(0)
    }

    /// Ends the session: closes the pipe, waits for the child and returns to
    /// the prior directory. Returns the captured stdout (write mode) or the
    /// unread stdout (read mode).
    pub fn eof_expecting(&mut self, expected: i32) -> Result<String> {
        let session = self
            .session
            .take()
            .ok_or_else(|| ProcessError::invalid_state("Attempted to close non-existent handle."))?;
        session.close(expected, self.toss_on_unexpected_exit)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support;
    use std::fs;
    use tempfile::tempdir;

    fn capture_files_in(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(crate::constants::CAPTURE_FILE_PREFIX))
            .collect()
    }

    #[test]
    fn test_parse_builds_program_and_arguments() {
        let _cwd = test_support::lock_and_restore_cwd();
        let runner = ProcessRunner::parse("prog a 'b c' d").unwrap();
        assert_eq!(runner.program(), "prog");
        assert_eq!(runner.arguments(), &["a", "b c", "d"]);
        assert!(!runner.is_interactive());
    }

    #[test]
    fn test_command_line_escapes_arguments() {
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::from_args(&["grep", "-r", "a; rm -rf ~"]).unwrap();
        runner.add_raw_argument("| head -n1").unwrap();

        let line = runner.command_line().unwrap();
        assert!(line.starts_with("grep -r "));
        assert!(line.ends_with(" | head -n1"));
        assert!(!line.contains(" a; rm"));
    }

    #[test]
    fn test_execute_joins_output_lines() {
        let _cwd = test_support::lock_and_restore_cwd();
        let runner = ProcessRunner::from_args(&["printf", "%s\\n", "first", "second"]).unwrap();
        assert_eq!(runner.execute().unwrap(), "first\nsecond");
    }

    #[test]
    fn test_execute_toss_policy() {
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("true").unwrap();
        runner.toss_if_unexpected();
        assert!(runner.execute_expecting(0).is_ok());

        let err = runner.execute_expecting(1).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::UnexpectedExit {
                expected: 1,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_execute_nonzero_is_not_an_error_by_default() {
        let _cwd = test_support::lock_and_restore_cwd();
        let runner = ProcessRunner::parse("false").unwrap();
        assert!(!runner.tosses_on_unexpected_exit());
        assert_eq!(runner.execute().unwrap(), "");
    }

    #[test]
    fn test_redirect_stderr_appends_null_sink() {
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::from_args(&["sh", "-c", "echo out; echo err >&2"]).unwrap();
        runner.redirect_stderr(true).unwrap();

        assert!(runner.command_line().unwrap().ends_with(" 2>/dev/null"));
        assert_eq!(runner.execute().unwrap(), "out");
    }

    #[test]
    fn test_add_argument_splits_and_groups() {
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("echo").unwrap();
        runner
            .add_argument("-n 'hello world'")
            .unwrap()
            .add_arguments(&["x", "y z"])
            .unwrap();
        assert_eq!(runner.arguments(), &["-n", "hello world", "x", "y", "z"]);
        assert!(runner.add_raw_argument("").is_err());
    }

    #[test]
    fn test_write_session_round_trip_removes_capture_file() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("cat").unwrap();
        runner.set_working_directory(dir.path()).unwrap();

        runner.begin_interactive(InteractiveMode::Write).unwrap();
        assert_eq!(runner.interactive_mode(), Some(InteractiveMode::Write));
        assert_eq!(capture_files_in(dir.path()).len(), 1);

        write!(runner, "{}", "x").unwrap();
        let output = runner.eof().unwrap();

        assert_eq!(output, "x");
        assert!(capture_files_in(dir.path()).is_empty());
        assert!(!runner.is_interactive());
    }

    #[test]
    fn test_write_session_multiple_writes() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("sort").unwrap();
        runner.set_working_directory(dir.path()).unwrap();

        runner
            .begin_interactive(InteractiveMode::Write)
            .unwrap()
            .write_str("pear\n")
            .unwrap()
            .write_str("apple\n")
            .unwrap();
        writeln!(runner, "{}", "fig").unwrap();

        assert_eq!(runner.eof().unwrap(), "apple\nfig\npear\n");
    }

    #[test]
    fn test_session_changes_and_restores_directory() {
        let home = tempdir().unwrap();
        let work = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("cat").unwrap();
        runner.set_working_directory(work.path()).unwrap();
        workdir::change_directory(&Directory::new(home.path()).unwrap()).unwrap();
        let prior = Directory::current().unwrap();

        runner.begin_interactive(InteractiveMode::Write).unwrap();
        assert_eq!(runner.prior_directory(), Some(&prior));
        assert_eq!(&Directory::current().unwrap(), runner.working_directory());

        runner.eof().unwrap();
        assert_eq!(Directory::current().unwrap(), prior);
    }

    #[test]
    fn test_read_session() {
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::from_args(&["printf", "l1\\nl2\\nl3\\n"]).unwrap();
        runner.begin_interactive(InteractiveMode::Read).unwrap();

        assert_eq!(runner.read_line().unwrap().as_deref(), Some("l1"));
        assert_eq!(runner.eof().unwrap(), "l2\nl3\n");
    }

    #[test]
    fn test_read_session_end_of_stream() {
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("echo only").unwrap();
        runner.begin_interactive(InteractiveMode::Read).unwrap();

        assert_eq!(runner.read_line().unwrap().as_deref(), Some("only"));
        assert_eq!(runner.read_line().unwrap(), None);
        assert_eq!(runner.eof().unwrap(), "");
    }

    #[test]
    fn test_invalid_state_transitions() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("cat").unwrap();
        runner.set_working_directory(dir.path()).unwrap();

        assert!(matches!(runner.eof(), Err(ProcessError::InvalidState(_))));
        assert!(matches!(runner.write_str("x"), Err(ProcessError::InvalidState(_))));
        assert!(matches!(runner.read_line(), Err(ProcessError::InvalidState(_))));

        runner.begin_interactive(InteractiveMode::Write).unwrap();
        assert!(matches!(
            runner.begin_interactive(InteractiveMode::Write),
            Err(ProcessError::InvalidState(_))
        ));
        assert!(matches!(runner.read_line(), Err(ProcessError::InvalidState(_))));
        assert!(matches!(runner.add_argument("-n"), Err(ProcessError::InvalidState(_))));
        assert!(matches!(runner.redirect_stderr(true), Err(ProcessError::InvalidState(_))));
        assert!(matches!(runner.execute(), Err(ProcessError::InvalidState(_))));
        assert!(matches!(
            runner.set_working_directory("."),
            Err(ProcessError::InvalidState(_))
        ));

        runner.eof().unwrap();
        assert!(matches!(runner.eof(), Err(ProcessError::InvalidState(_))));
    }

    #[test]
    fn test_write_in_read_mode_is_invalid() {
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("echo hi").unwrap();
        runner.begin_interactive(InteractiveMode::Read).unwrap();
        assert!(matches!(runner.write_str("x"), Err(ProcessError::InvalidState(_))));
        runner.eof().unwrap();
    }

    #[test]
    fn test_zero_length_write_fails() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("cat").unwrap();
        runner.set_working_directory(dir.path()).unwrap();
        runner.begin_interactive(InteractiveMode::Write).unwrap();
        assert!(matches!(runner.write_str(""), Err(ProcessError::Write(_))));
        assert!(runner.is_interactive());
        runner.eof().unwrap();
    }

    #[test]
    fn test_eof_toss_still_releases_resources() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let before = Directory::current().unwrap();
        let mut runner =
            ProcessRunner::from_args(&["sh", "-c", "cat >/dev/null; echo done; exit 4"]).unwrap();
        runner.set_working_directory(dir.path()).unwrap();
        workdir::change_directory(&before).unwrap();
        runner.toss_if_unexpected();

        runner.begin_interactive(InteractiveMode::Write).unwrap();
        runner.write_str("ignored\n").unwrap();
        let err = runner.eof().unwrap_err();

        assert!(matches!(err, ProcessError::UnexpectedExit { actual: 4, .. }));
        assert!(capture_files_in(dir.path()).is_empty());
        assert_eq!(Directory::current().unwrap(), before);
        assert!(!runner.is_interactive());

        // A fresh session can be opened afterwards.
        runner.begin_interactive(InteractiveMode::Write).unwrap();
        assert!(runner.eof_expecting(4).is_ok());
    }

    #[test]
    fn test_set_working_directory_rejects_unwritable() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("ls").unwrap();
        let original = runner.working_directory().clone();

        let err = runner
            .set_working_directory(dir.path().join("does-not-exist"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::Environment(_)));
        assert_eq!(runner.working_directory(), &original);
        assert_eq!(Directory::current().unwrap(), original);
    }

    #[test]
    fn test_set_working_directory_rejects_read_only_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
        let _cwd = test_support::lock_and_restore_cwd();

        // Permission bits do not bind root.
        if tempfile::tempfile_in(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut runner = ProcessRunner::parse("ls").unwrap();
        let original = runner.working_directory().clone();
        let err = runner.set_working_directory(&locked).unwrap_err();
        assert!(matches!(err, ProcessError::Environment(_)));
        assert_eq!(runner.working_directory(), &original);
        assert_eq!(Directory::current().unwrap(), original);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_sessions_in_current_directory_run_side_by_side() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        workdir::change_directory(&Directory::new(dir.path()).unwrap()).unwrap();

        let mut producer = ProcessRunner::from_args(&["printf", "a\\nb\\n"]).unwrap();
        let mut consumer = ProcessRunner::parse("sort -r").unwrap();
        producer.begin_interactive(InteractiveMode::Read).unwrap();
        consumer.begin_interactive(InteractiveMode::Write).unwrap();

        while let Some(line) = producer.read_line().unwrap() {
            writeln!(consumer, "{}", line).unwrap();
        }
        assert_eq!(producer.eof().unwrap(), "");
        assert_eq!(consumer.eof().unwrap(), "b\na\n");
        assert!(capture_files_in(dir.path()).is_empty());
    }

    #[test]
    fn test_set_working_directory_moves_process() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("pwd").unwrap();
        runner.set_working_directory(dir.path()).unwrap();

        let expected = Directory::new(dir.path()).unwrap();
        assert_eq!(runner.working_directory(), &expected);
        assert_eq!(Directory::current().unwrap(), expected);
        assert_eq!(
            Directory::new(runner.execute().unwrap()).unwrap(),
            expected
        );
    }

    #[test]
    fn test_dropping_open_session_cleans_up() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let before = Directory::current().unwrap();
        {
            let mut runner = ProcessRunner::parse("cat").unwrap();
            runner.set_working_directory(dir.path()).unwrap();
            workdir::change_directory(&before).unwrap();
            runner.begin_interactive(InteractiveMode::Write).unwrap();
            runner.write_str("never read\n").unwrap();
        }
        assert!(capture_files_in(dir.path()).is_empty());
        assert_eq!(Directory::current().unwrap(), before);
    }

    #[test]
    fn test_apply_config() {
        let dir = tempdir().unwrap();
        let _cwd = test_support::lock_and_restore_cwd();
        let mut runner = ProcessRunner::parse("ls").unwrap();
        let config = RunnerConfig {
            toss_on_unexpected_exit: true,
            redirect_stderr: true,
            search_path: None,
            working_directory: Some(dir.path().display().to_string()),
        };
        runner.apply_config(&config).unwrap();

        assert!(runner.tosses_on_unexpected_exit());
        assert!(runner.command_line().unwrap().ends_with("2>/dev/null"));
        assert_eq!(runner.working_directory(), &Directory::new(dir.path()).unwrap());
    }

    #[test]
    fn test_exists_with_and_without_directories() {
        let _lock = test_support::lock_global_state();
        paths::reset_search_path();
        assert!(paths::exists("sh"));
        assert!(paths::exists("/bin/sh"));
        assert!(!paths::exists("doesnotexist12345"));
    }
}
