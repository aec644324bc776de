//! Event logging for review-intake.
//!
//! Every state-changing action is appended to an audit log in NDJSON format
//! (one JSON object per line) at `{state_dir}/events/events.ndjson`. The log
//! answers "when was this group's repository created, which issue did the
//! last upload update, who reset that registry entry" after the fact.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: The action performed (intake, bootstrap, upload, ...)
//! - `actor`: The user running the tool (e.g., `user@HOST`)
//! - `subject`: Optional `<canonical logins>/<assignment>`
//! - `details`: Freeform object with action-specific details

use crate::context::IntakeContext;
use crate::error::{IntakeError, Result};
use crate::locks::actor_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A submission was committed to its repository
    Intake,
    /// A repository was created from the template
    Bootstrap,
    /// A registry entry was dropped because its repository was missing
    DriftReset,
    /// A revision was sent to the review service
    Upload,
    /// An issue number was recorded
    IssueSet,
    /// An issue number was removed by an operator
    IssueClear,
    /// A lock was cleared manually
    LockClear,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventAction::Intake => "intake",
            EventAction::Bootstrap => "bootstrap",
            EventAction::DriftReset => "drift_reset",
            EventAction::Upload => "upload",
            EventAction::IssueSet => "issue_set",
            EventAction::IssueClear => "issue_clear",
            EventAction::LockClear => "lock_clear",
        };
        write!(f, "{}", name)
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// `<canonical logins>/<assignment>` for repository-specific events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            subject: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the subject for this event.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            IntakeError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Append an event to the events log.
///
/// The file and its directory are created if missing. Each append writes one
/// line with a trailing newline and syncs it to disk.
pub fn append_event(ctx: &IntakeContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    let events_dir = ctx.events_dir();
    if !events_dir.exists() {
        fs::create_dir_all(&events_dir).map_err(|e| {
            IntakeError::UserError(format!(
                "failed to create events directory '{}': {}",
                events_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            IntakeError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            IntakeError::UserError(format!(
                "failed to write event to '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    Ok(())
}
