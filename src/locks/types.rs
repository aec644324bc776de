//! Lock names and the view of a lock shown to operators.

use super::holder::LockHolder;
use crate::context::IntakeContext;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockType {
    /// Whole `add` runs (shared scratch directory and repositories).
    Intake,
    /// Issue registry writes.
    Registry,
}

impl LockType {
    pub const ALL: [LockType; 2] = [LockType::Intake, LockType::Registry];

    /// Name used by `lock clear` and as the lock file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            LockType::Intake => "intake",
            LockType::Registry => "registry",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Where this lock's file lives.
    pub fn path(&self, ctx: &IntakeContext) -> PathBuf {
        match self {
            LockType::Intake => ctx.intake_lock_path(),
            LockType::Registry => ctx.registry_lock_path(),
        }
    }
}

/// A lock file found on disk.
#[derive(Debug, Clone)]
pub struct LockInfo {
    pub path: PathBuf,
    pub lock_type: LockType,
    pub holder: LockHolder,
    /// Held longer than `lock_stale_minutes`.
    pub is_stale: bool,
}

impl fmt::Display for LockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.lock_type.as_str(), self.holder.describe())?;
        if self.is_stale {
            write!(f, " [STALE]")?;
        }
        Ok(())
    }
}
