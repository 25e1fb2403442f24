//! # System Interaction Layer
//!
//! Everything that touches the operating system: spawning shells, pipes,
//! scratch files and the process-wide current directory.
//!
//! ## Modules
//!
//! - **`executor`**: Wraps a command line in the platform shell and runs it to
//!   completion, capturing stdout and applying the exit-code policy.
//! - **`session`**: A child process kept open behind a single pipe, written to
//!   or read from until it is closed.
//! - **`fs`**: The directory and capture-file handles used by the runner.
//! - **`workdir`**: Changes the current directory and serializes ownership of
//!   it between interactive sessions that need to move the process.
//! - **`host`**: Environment variable and OS lookups behind a trait.

pub mod executor;
pub mod fs;
pub mod host;
pub mod session;
pub mod workdir;
