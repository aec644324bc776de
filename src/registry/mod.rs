//! Issue registry: which review-service issue belongs to which repository.
//!
//! Each (participant set, assignment) pair maps to at most one positive issue
//! id. The id is recorded after the first upload creates an issue and is read
//! on every later upload to decide between a new issue and an update.
//!
//! The workflows only see the [`IssueRegistry`] trait; [`FileRegistry`] is
//! the JSON-file store the CLI wires in.

mod store;

#[cfg(test)]
mod tests;

pub use store::FileRegistry;

use crate::error::Result;
use crate::participants::ParticipantSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one repository in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IssueKey {
    /// Sorted, duplicate-free logins.
    pub participants: Vec<String>,
    /// Assignment name as given on the command line.
    pub assignment: String,
}

impl IssueKey {
    pub fn new(participants: &ParticipantSet, assignment: &str) -> Self {
        Self {
            participants: participants.logins().to_vec(),
            assignment: assignment.to_string(),
        }
    }
}

impl fmt::Display for IssueKey {
    /// `<concatenated logins>/<assignment>`, matching the repository layout.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.participants.concat(), self.assignment)
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    #[serde(flatten)]
    pub key: IssueKey,
    pub issue: u64,
}

/// Persistent mapping from [`IssueKey`] to issue id.
pub trait IssueRegistry {
    /// The recorded issue id, if any.
    fn get(&self, key: &IssueKey) -> Result<Option<u64>>;

    /// Record `issue` for `key`, replacing any previous id. Zero is rejected.
    fn set(&self, key: &IssueKey, issue: u64) -> Result<()>;

    /// Remove the entry for `key` if it still records `issue`.
    ///
    /// Returns true if an entry was removed.
    fn remove(&self, key: &IssueKey, issue: u64) -> Result<bool>;

    /// Every entry, ordered by key.
    fn list(&self) -> Result<Vec<IssueRecord>>;
}
