//! # procline
//!
//! Builds shell-safe command lines from a program and its arguments, and runs
//! them either synchronously (all stdout captured) or as interactive sessions
//! driven through a pipe.
//!
//! The entry point is [`ProcessRunner`].

pub mod cli;
pub mod constants;
pub mod core;
pub mod errors;
pub mod models;
pub mod runner;
pub mod system;

#[cfg(test)]
mod test_support;

pub use errors::{ProcessError, Result};
pub use models::{InteractiveMode, OsKind, RunnerConfig};
pub use runner::ProcessRunner;
