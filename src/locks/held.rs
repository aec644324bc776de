//! A lock owned by this process for as long as a value lives.

use super::types::LockType;
use crate::error::{IntakeError, Result};
use std::fs;
use std::path::PathBuf;

/// A lock file this process created. Dropping it deletes the file; a
/// deletion that fails on drop is only a warning.
#[must_use = "the lock is released as soon as this value is dropped"]
#[derive(Debug)]
pub struct HeldLock {
    lock_type: LockType,
    path: PathBuf,
    released: bool,
}

impl HeldLock {
    pub(super) fn new(lock_type: LockType, path: PathBuf) -> Self {
        Self {
            lock_type,
            path,
            released: false,
        }
    }

    /// Delete the lock file now and report a failure as a `LockError`.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_file(&self.path).map_err(|e| {
            IntakeError::LockError(format!(
                "failed to release the {} lock at '{}': {}",
                self.lock_type.as_str(),
                self.path.display(),
                e
            ))
        })
    }
}

impl Drop for HeldLock {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            eprintln!(
                "Warning: the {} lock at '{}' was not released: {}",
                self.lock_type.as_str(),
                self.path.display(),
                e
            );
        }
    }
}
