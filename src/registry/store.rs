//! JSON-file registry store.

use super::{IssueKey, IssueRecord, IssueRegistry};
use crate::context::IntakeContext;
use crate::error::{IntakeError, Result};
use crate::fs::atomic_write_file;
use crate::locks::acquire_registry_lock;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

/// On-disk shape of `registry.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    issues: Vec<IssueRecord>,
}

/// [`IssueRegistry`] stored as one JSON document in the state directory.
///
/// Reads see either the previous or the next document because every write
/// goes through a temp file and rename. Writers serialize on the registry
/// lock so concurrent updates are not lost.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    ctx: IntakeContext,
}

impl FileRegistry {
    pub fn new(ctx: &IntakeContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    fn path(&self) -> PathBuf {
        self.ctx.registry_path()
    }

    fn load(&self) -> Result<RegistryDocument> {
        let path = self.path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RegistryDocument::default()),
            Err(e) => {
                return Err(IntakeError::UserError(format!(
                    "failed to read issue registry '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            IntakeError::UserError(format!(
                "failed to parse issue registry '{}': {}\n\
                 Fix: repair or remove the file; issue numbers can be restored with `issue set`.",
                path.display(),
                e
            ))
        })
    }

    fn save(&self, doc: &mut RegistryDocument) -> Result<()> {
        doc.issues.sort_by(|a, b| a.key.cmp(&b.key));
        let json = serde_json::to_string_pretty(doc).map_err(|e| {
            IntakeError::UserError(format!("failed to serialize issue registry: {}", e))
        })?;
        atomic_write_file(self.path(), &format!("{}\n", json))
    }

    /// Read, change and write back the document under the registry lock.
    fn update<T>(&self, action: &str, f: impl FnOnce(&mut RegistryDocument) -> T) -> Result<T> {
        let guard = acquire_registry_lock(&self.ctx, action)?;
        let mut doc = self.load()?;
        let result = f(&mut doc);
        self.save(&mut doc)?;
        guard.release()?;
        Ok(result)
    }
}

impl IssueRegistry for FileRegistry {
    fn get(&self, key: &IssueKey) -> Result<Option<u64>> {
        Ok(self
            .load()?
            .issues
            .into_iter()
            .find(|r| &r.key == key)
            .map(|r| r.issue))
    }

    fn set(&self, key: &IssueKey, issue: u64) -> Result<()> {
        if issue == 0 {
            return Err(IntakeError::UserError(format!(
                "issue id for {} must be a positive integer",
                key
            )));
        }

        self.update("issue_set", |doc| {
            doc.issues.retain(|r| &r.key != key);
            doc.issues.push(IssueRecord {
                key: key.clone(),
                issue,
            });
        })
    }

    fn remove(&self, key: &IssueKey, issue: u64) -> Result<bool> {
        self.update("issue_remove", |doc| {
            let before = doc.issues.len();
            doc.issues.retain(|r| !(&r.key == key && r.issue == issue));
            doc.issues.len() != before
        })
    }

    fn list(&self) -> Result<Vec<IssueRecord>> {
        let mut issues = self.load()?.issues;
        issues.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(issues)
    }
}
