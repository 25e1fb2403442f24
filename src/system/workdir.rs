// src/system/workdir.rs

use crate::{
    errors::{ProcessError, Result},
    system::fs::Directory,
};
use lazy_static::lazy_static;
use scopeguard::ScopeGuard;
use std::env;
use std::sync::{Mutex, MutexGuard, TryLockError};

lazy_static! {
    /// The current directory is process-global; whoever holds this may change it.
    static ref DIRECTORY_LOCK: Mutex<()> = Mutex::new(());
}

fn try_acquire() -> Result<MutexGuard<'static, ()>> {
    match DIRECTORY_LOCK.try_lock() {
        Ok(guard) => Ok(guard),
        Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => Err(ProcessError::environment(
            "Another interactive session owns the current directory.",
        )),
    }
}

/// Changes the process current directory.
pub fn change_directory(dir: &Directory) -> Result<()> {
    env::set_current_dir(dir.path()).map_err(|e| {
        ProcessError::environment(format!(
            "Could not change directory to '{}': {}",
            dir.path().display(),
            e
        ))
    })?;
    log::debug!("Changed directory to: {}", dir.path().display());
    Ok(())
}

/// Changes directory unless an interactive session currently owns it.
pub fn change_directory_exclusive(dir: &Directory) -> Result<()> {
    let _guard = try_acquire()?;
    change_directory(dir)
}

/// A session's hold on the current directory.
///
/// Sessions that run where the process already is share the directory and
/// take no lock. Sessions elsewhere own it exclusively: the lease moves into
/// the target and returns to the prior directory when released, explicitly
/// or on drop.
#[derive(Debug)]
pub struct DirectoryLease {
    prior: Directory,
    exclusive: Option<ExclusiveHold>,
}

#[derive(Debug)]
struct ExclusiveHold {
    restore: ScopeGuard<Directory, fn(Directory)>,
    _guard: MutexGuard<'static, ()>,
}

fn restore_on_drop(prior: Directory) {
    if let Err(e) = change_directory(&prior) {
        log::warn!("Failed to restore working directory: {}", e);
    }
}

impl DirectoryLease {
    /// Takes the lease for `target`, moving into it when it is not already current.
    pub fn acquire(target: &Directory) -> Result<Self> {
        let current = Directory::current()?;
        if current.same_as(target) {
            return Ok(Self {
                prior: current,
                exclusive: None,
            });
        }

        let guard = try_acquire()?;
        // Re-read under the lock; another lease may have moved the process meanwhile.
        let prior = Directory::current()?;
        change_directory(target)?;
        Ok(Self {
            prior: prior.clone(),
            exclusive: Some(ExclusiveHold {
                restore: scopeguard::guard(prior, restore_on_drop as fn(Directory)),
                _guard: guard,
            }),
        })
    }

    pub fn prior(&self) -> &Directory {
        &self.prior
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive.is_some()
    }

    /// Goes back to the prior directory and gives up the lease.
    pub fn release(self) -> Result<()> {
        match self.exclusive {
            Some(ExclusiveHold { restore, _guard }) => {
                change_directory(&ScopeGuard::into_inner(restore))
            }
            None => Ok(()),
        }
    }
}
