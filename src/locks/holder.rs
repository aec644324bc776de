//! The lock file body: who took a lock, for what, and when.

use crate::error::{IntakeError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The process holding a lock, stored as JSON inside the lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockHolder {
    /// `user@host` that ran the holding command.
    pub owner: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    pub created_at: DateTime<Utc>,

    /// Command that took the lock (`add`, `issue_set`, ...).
    pub action: String,

    /// Assignment and logins an `add` run is working through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl LockHolder {
    /// This process, about to run `action`.
    pub fn current(action: &str, subject: Option<&str>) -> Self {
        Self {
            owner: actor_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            action: action.to_string(),
            subject: subject.map(str::to_string),
        }
    }

    /// Read the holder recorded in an existing lock file.
    pub fn read(path: &Path) -> Result<Self> {
        let unreadable = |what: &str, e: &dyn std::fmt::Display| {
            IntakeError::UserError(format!(
                "failed to {} lock file '{}': {}",
                what,
                path.display(),
                e
            ))
        };
        let content = fs::read_to_string(path).map_err(|e| unreadable("read", &e))?;
        serde_json::from_str(&content).map_err(|e| unreadable("parse", &e))
    }

    pub(super) fn encode(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| IntakeError::UserError(format!("failed to encode lock holder: {}", e)))
    }

    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Age in its two largest units: `3d 4h`, `2h 5m` or `12m`.
    pub fn age_display(&self) -> String {
        let minutes = self.age().num_minutes().max(0);
        let (days, hours, minutes) = (minutes / 1440, minutes / 60 % 24, minutes % 60);
        match (days, hours) {
            (0, 0) => format!("{}m", minutes),
            (0, _) => format!("{}h {}m", hours, minutes),
            _ => format!("{}d {}h", days, hours),
        }
    }

    /// True once the lock has been held longer than `stale_minutes`.
    pub fn is_stale(&self, stale_minutes: u32) -> bool {
        self.age().num_minutes() > i64::from(stale_minutes)
    }

    /// `add (hw1 cs61a-ab) by user@host, 12m ago`
    pub fn describe(&self) -> String {
        let subject = self
            .subject
            .as_deref()
            .map(|s| format!(" ({})", s))
            .unwrap_or_default();
        format!(
            "{}{} by {}, {} ago",
            self.action,
            subject,
            self.owner,
            self.age_display()
        )
    }
}

/// `user@host` of the current process, shared by locks and events.
pub(crate) fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{}@{}", user, host)
}
