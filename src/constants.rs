// src/constants.rs

/// Prefix of the scratch file that captures a write-mode session's standard output.
pub const CAPTURE_FILE_PREFIX: &str = "procline__";

/// Search path variable on Windows.
pub const WINDOWS_PATH_VAR: &str = "Path";

/// Search path variable everywhere else.
pub const POSIX_PATH_VAR: &str = "PATH";

/// Executable suffix appended/stripped on Windows.
pub const WINDOWS_EXE_SUFFIX: &str = ".exe";

/// Stderr redirection to the null device for `cmd.exe`.
pub const WINDOWS_NULL_REDIRECT: &str = "2>nul";

/// Stderr redirection to the null device for POSIX shells.
pub const POSIX_NULL_REDIRECT: &str = "2>/dev/null";

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "PROCLINE_CONFIG";

/// Directory name inside the system config directory (`~/.config/procline`).
pub const CONFIG_DIR_NAME: &str = "procline";

/// The name of the configuration file inside the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Number of characters of a session write echoed to the debug log.
pub const WRITE_LOG_PREVIEW: usize = 100;
