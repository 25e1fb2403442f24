// src/core/paths.rs

use crate::{
    constants::{POSIX_PATH_VAR, WINDOWS_EXE_SUFFIX, WINDOWS_PATH_VAR},
    models::OsKind,
    system::host::{HostEnvironment, SystemHost},
};
use lazy_static::lazy_static;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

lazy_static! {
    static ref SEARCH_PATH: Mutex<Option<PathResolver>> = Mutex::new(None);
}

/// A search path and the lookups made against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    os: OsKind,
    path: String,
}

impl PathResolver {
    /// Reads `Path` (Windows) or `PATH` from the host. A missing variable yields an empty path.
    pub fn from_host(host: &dyn HostEnvironment) -> Self {
        let os = host.current_os();
        let var = if os.is_windows() {
            WINDOWS_PATH_VAR
        } else {
            POSIX_PATH_VAR
        };
        Self {
            os,
            path: host.get_env(var).unwrap_or_default(),
        }
    }

    /// Builds a resolver from an explicit path, normalized for `os`.
    pub fn with_path(os: OsKind, path: &str) -> Self {
        let mut resolver = Self {
            os,
            path: String::new(),
        };
        resolver.set_path(path);
        resolver
    }

    /// Replaces the search path. On Windows a `:`-delimited list is rewritten with `;`.
    pub fn set_path(&mut self, path: &str) {
        self.path = if self.os.is_windows() {
            normalize_windows_path_list(path)
        } else {
            path.to_string()
        };
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entries(&self) -> Vec<&str> {
        self.path
            .split(self.os.path_delimiter())
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    /// Whether `bin_name` exists as a regular file in one of the search path entries.
    /// Leading directories in `bin_name` are ignored. Executability is NOT checked.
    pub fn exists(&self, bin_name: &str) -> bool {
        let Some(file_name) = lookup_name(bin_name, self.os) else {
            return false;
        };
        let found = self
            .entries()
            .into_iter()
            .map(|entry| Path::new(entry).join(&file_name))
            .find(|candidate| candidate.is_file());

        match &found {
            Some(candidate) => log::debug!("Found '{}' at {}", bin_name, candidate.display()),
            None => log::debug!("'{}' not found in search path", bin_name),
        }
        found.is_some()
    }
}

/// Keeps only the final path segment and appends `.exe` on Windows when absent.
fn lookup_name(bin_name: &str, os: OsKind) -> Option<String> {
    let last = bin_name.rsplit(['/', '\\']).next()?.trim();
    if last.is_empty() {
        return None;
    }
    let has_suffix = last.len() >= WINDOWS_EXE_SUFFIX.len()
        && last.is_char_boundary(last.len() - WINDOWS_EXE_SUFFIX.len())
        && last
            .split_at(last.len() - WINDOWS_EXE_SUFFIX.len())
            .1
            .eq_ignore_ascii_case(WINDOWS_EXE_SUFFIX);
    if os.is_windows() && !has_suffix {
        Some(format!("{}{}", last, WINDOWS_EXE_SUFFIX))
    } else {
        Some(last.to_string())
    }
}

/// Rewrites `:` separators as `;`, leaving drive letters (`C:\`, `d:/`) intact.
fn normalize_windows_path_list(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut entry_len = 0usize;
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' => {
                let is_drive = entry_len == 1
                    && normalized.chars().last().is_some_and(|d| d.is_ascii_alphabetic())
                    && matches!(chars.peek(), Some('\\') | Some('/'));
                if is_drive {
                    normalized.push(':');
                    entry_len += 1;
                } else {
                    normalized.push(';');
                    entry_len = 0;
                }
            }
            ';' => {
                normalized.push(';');
                entry_len = 0;
            }
            other => {
                normalized.push(other);
                entry_len += 1;
            }
        }
    }
    normalized
}

fn lock_search_path() -> MutexGuard<'static, Option<PathResolver>> {
    SEARCH_PATH.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the process-wide search path.
///
/// The first call reads it from the environment; later calls reuse the cached
/// value. Passing `override_path` replaces the cached value.
pub fn resolve_search_path(override_path: Option<&str>) -> String {
    let mut cached = lock_search_path();
    let resolver = cached.get_or_insert_with(|| PathResolver::from_host(&SystemHost));
    if let Some(path) = override_path {
        log::debug!("Search path overridden: {}", path);
        resolver.set_path(path);
    }
    resolver.path().to_string()
}

/// The cached search path split into its entries.
pub fn search_path_entries() -> Vec<String> {
    let mut cached = lock_search_path();
    cached
        .get_or_insert_with(|| PathResolver::from_host(&SystemHost))
        .entries()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Whether `bin_name` can be found in the process-wide search path.
pub fn exists(bin_name: &str) -> bool {
    let mut cached = lock_search_path();
    cached
        .get_or_insert_with(|| PathResolver::from_host(&SystemHost))
        .exists(bin_name)
}

/// Drops the cached search path so the next lookup reads the environment again.
pub fn reset_search_path() {
    *lock_search_path() = None;
}
