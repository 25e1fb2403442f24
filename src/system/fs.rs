// src/system/fs.rs

use crate::{
    constants::CAPTURE_FILE_PREFIX,
    errors::{ProcessError, Result},
    system::executor::decode_output,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tempfile::TempPath;

/// An absolute directory path with the checks the runner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    path: PathBuf,
}

impl Directory {
    /// Resolves `path` against the current directory. The directory does not need to exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resolved = match dunce::canonicalize(path) {
            Ok(canonical) => canonical,
            Err(_) => std::path::absolute(path)?,
        };
        Ok(Self { path: resolved })
    }

    /// The process-wide current directory.
    pub fn current() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            ProcessError::environment(format!("Could not determine the current directory: {}", e))
        })?;
        Ok(Self {
            path: dunce::simplified(&cwd).to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether both name the same directory once symlinks are resolved.
    pub fn same_as(&self, other: &Directory) -> bool {
        if self.path == other.path {
            return true;
        }
        match (dunce::canonicalize(&self.path), dunce::canonicalize(&other.path)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// A directory is writable if a scratch file can be created in it.
    /// Non-existent paths are never writable.
    pub fn is_writable(&self) -> bool {
        if !self.path.is_dir() {
            return false;
        }
        match tempfile::tempfile_in(&self.path) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("'{}' is not writable: {}", self.path.display(), e);
                false
            }
        }
    }
}

/// Scratch file receiving a write-mode session's standard output.
///
/// The file is removed when `delete` is called or, failing that, on drop.
#[derive(Debug)]
pub struct CaptureFile {
    path: TempPath,
}

impl CaptureFile {
    pub fn create_in(dir: &Directory) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(CAPTURE_FILE_PREFIX)
            .tempfile_in(dir.path())?;
        let path = file.into_temp_path();
        log::debug!("Capture file created at: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String> {
        let bytes = fs::read(&self.path)?;
        Ok(decode_output(bytes))
    }

    pub fn delete(self) -> Result<()> {
        let display = self.path.display().to_string();
        self.path.close()?;
        log::debug!("Capture file deleted: {}", display);
        Ok(())
    }
}
