//! Taking, listing and clearing locks.

use super::held::HeldLock;
use super::holder::LockHolder;
use super::types::{LockInfo, LockType};
use crate::config::Config;
use crate::context::IntakeContext;
use crate::error::{IntakeError, Result};
use crate::fs::ensure_dir;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

/// Create `lock_type`'s file exclusively and record `holder` in it.
///
/// An existing file means another run holds the lock: `LockError`, naming
/// that run when its file can be read.
fn acquire(ctx: &IntakeContext, lock_type: LockType, holder: &LockHolder) -> Result<HeldLock> {
    let path = lock_type.path(ctx);
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let held_by = LockHolder::read(&path)
                .map(|h| format!("\nHeld by: {}", h.describe()))
                .unwrap_or_default();
            return Err(IntakeError::LockError(format!(
                "the {} lock is held by another process\nLock: {}{}",
                lock_type.as_str(),
                path.display(),
                held_by
            )));
        }
        Err(e) => {
            return Err(IntakeError::LockError(format!(
                "failed to create lock '{}': {}",
                path.display(),
                e
            )));
        }
    };

    let body = holder.encode()?;
    if let Err(e) = file.write_all(body.as_bytes()).and_then(|_| file.sync_all()) {
        let _ = fs::remove_file(&path);
        return Err(IntakeError::LockError(format!(
            "failed to record the holder of '{}': {}",
            path.display(),
            e
        )));
    }

    Ok(HeldLock::new(lock_type, path))
}

/// Take the intake lock for a whole `add` run. `subject` names the
/// assignment and logins, for whoever finds the lock held.
pub fn acquire_intake_lock(ctx: &IntakeContext, action: &str, subject: &str) -> Result<HeldLock> {
    acquire(ctx, LockType::Intake, &LockHolder::current(action, Some(subject)))
}

/// Take the registry lock around one registry update.
pub fn acquire_registry_lock(ctx: &IntakeContext, action: &str) -> Result<HeldLock> {
    acquire(ctx, LockType::Registry, &LockHolder::current(action, None))
}

/// Locks currently held. A lock file that cannot be read is left out.
pub fn list_locks(ctx: &IntakeContext, config: &Config) -> Result<Vec<LockInfo>> {
    let locks = LockType::ALL
        .into_iter()
        .filter_map(|lock_type| {
            let path = lock_type.path(ctx);
            let holder = LockHolder::read(&path).ok()?;
            let is_stale = holder.is_stale(config.lock_stale_minutes);
            Some(LockInfo {
                path,
                lock_type,
                holder,
                is_stale,
            })
        })
        .collect();
    Ok(locks)
}

/// Delete the lock named `name` and return what it held, for the audit log.
///
/// Checking that clearing is safe (`--force`) is up to the caller.
pub fn clear_lock(ctx: &IntakeContext, name: &str, config: &Config) -> Result<LockInfo> {
    let lock_type = LockType::from_name(name).ok_or_else(|| {
        IntakeError::UserError(format!(
            "unknown lock '{}'. Expected 'intake' or 'registry'.",
            name
        ))
    })?;
    let path = lock_type.path(ctx);

    if !path.exists() {
        return Err(IntakeError::UserError(format!(
            "lock '{}' does not exist at: {}",
            name,
            path.display()
        )));
    }

    let holder = LockHolder::read(&path)?;
    let is_stale = holder.is_stale(config.lock_stale_minutes);

    fs::remove_file(&path).map_err(|e| {
        IntakeError::UserError(format!("failed to clear lock '{}': {}", path.display(), e))
    })?;

    Ok(LockInfo {
        path,
        lock_type,
        holder,
        is_stale,
    })
}
