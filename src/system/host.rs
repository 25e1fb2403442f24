// src/system/host.rs

use crate::models::OsKind;
use std::env;

/// Read-only view of the host: environment variables and OS family.
/// Tests substitute their own implementation instead of touching the real environment.
pub trait HostEnvironment {
    fn get_env(&self, name: &str) -> Option<String>;
    fn current_os(&self) -> OsKind;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostEnvironment for SystemHost {
    fn get_env(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }

    fn current_os(&self) -> OsKind {
        OsKind::current()
    }
}
