// src/test_support.rs
//
// Tests that touch process-global state (current directory, cached search path)
// run one at a time.

use lazy_static::lazy_static;
use scopeguard::ScopeGuard;
use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

lazy_static! {
    static ref GLOBAL_STATE: Mutex<()> = Mutex::new(());
}

pub(crate) fn lock_global_state() -> MutexGuard<'static, ()> {
    GLOBAL_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Locks global state and puts the current directory back when dropped.
/// Declare it after any temp dir the test enters, so it runs first on drop.
pub(crate) fn lock_and_restore_cwd()
-> ScopeGuard<(MutexGuard<'static, ()>, PathBuf), impl FnOnce((MutexGuard<'static, ()>, PathBuf))> {
    let lock = lock_global_state();
    let original = env::current_dir().unwrap_or_else(|_| env::temp_dir());
    scopeguard::guard((lock, original), |(_lock, original)| {
        let _ = env::set_current_dir(original);
    })
}
