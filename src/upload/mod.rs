//! Uploading a repository's latest commit to the review service.
//!
//! The first upload for a (participants, assignment) pair opens a new issue
//! mailed to the students and their section reviewers and records its id in
//! the registry. Later uploads add a patch set to that issue.

mod command;
mod outcome;

#[cfg(test)]
mod tests;

pub use command::UploadRequest;
pub use outcome::{UploadOutcome, interpret_upload_output};

use crate::config::Config;
use crate::context::IntakeContext;
use crate::error::{IntakeError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::git::Vcs;
use crate::participants::ParticipantSet;
use crate::process::ProcessRunner;
use crate::registry::{IssueKey, IssueRegistry};
use crate::student_files::{read_gmails, read_sections};
use crate::timestamp;
use serde_json::json;
use std::path::Path;

/// Refusal when a repository names no review-service addresses.
pub const NO_GMAILS: &str = "student had no gmails; not uploading";

/// What one upload did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub outcome: UploadOutcome,
    /// The issue the revision landed in, when known.
    pub issue: Option<u64>,
    /// Revision that was uploaded.
    pub revision: String,
}

/// The upload workflow and its collaborators.
pub struct Uploader<'a> {
    ctx: &'a IntakeContext,
    config: &'a Config,
    runner: &'a dyn ProcessRunner,
    vcs: &'a dyn Vcs,
    registry: &'a dyn IssueRegistry,
}

impl<'a> Uploader<'a> {
    pub fn new(
        ctx: &'a IntakeContext,
        config: &'a Config,
        runner: &'a dyn ProcessRunner,
        vcs: &'a dyn Vcs,
        registry: &'a dyn IssueRegistry,
    ) -> Self {
        Self {
            ctx,
            config,
            runner,
            vcs,
            registry,
        }
    }

    /// Student addresses followed by the section reviewers not already listed.
    pub fn recipients(&self, repo_path: &Path) -> Result<Vec<String>> {
        let mut recipients = read_gmails(repo_path)?;
        if recipients.is_empty() {
            return Err(IntakeError::Upload(NO_GMAILS.to_string()));
        }

        let sections = read_sections(repo_path)?;
        for reviewer in self.config.reviewers_for_sections(&sections) {
            if !recipients.contains(&reviewer) {
                recipients.push(reviewer);
            }
        }
        Ok(recipients)
    }

    /// Upload the commit HEAD points at in `repo_path`.
    ///
    /// # Errors
    ///
    /// * `Upload` - no addresses, or the script failed
    /// * `GitError`, `UserError` - anything else
    pub fn upload(
        &self,
        repo_path: &Path,
        participants: &ParticipantSet,
        assignment: &str,
    ) -> Result<UploadReport> {
        let recipients = self.recipients(repo_path)?;
        let key = IssueKey::new(participants, assignment);
        let existing = self.registry.get(&key)?;
        let revision = self.vcs.revision_hash(repo_path)?;

        let request = match existing {
            None => UploadRequest::NewIssue {
                title: assignment.to_string(),
                recipients: recipients.clone(),
            },
            Some(issue) => UploadRequest::UpdateIssue {
                issue,
                title: timestamp::now(),
            },
        };
        let invocation = request.invocation(&self.config.upload, &revision, repo_path);

        println!("Uploading...");
        let output = self.runner.run(&invocation)?;
        let outcome = interpret_upload_output(&output)?;
        println!("Done uploading.");

        let issue = match outcome {
            UploadOutcome::Created { issue } => {
                println!("New issue {}; recording it.", issue);
                self.registry.set(&key, issue)?;
                append_event(
                    self.ctx,
                    &Event::new(EventAction::IssueSet)
                        .with_subject(key.to_string())
                        .with_details(json!({ "issue": issue, "source": "upload" })),
                )?;
                Some(issue)
            }
            UploadOutcome::Updated => existing,
        };

        append_event(
            self.ctx,
            &Event::new(EventAction::Upload)
                .with_subject(key.to_string())
                .with_details(json!({
                    "issue": issue,
                    "created": matches!(outcome, UploadOutcome::Created { .. }),
                    "revision": revision,
                    "recipients": recipients,
                })),
        )?;

        Ok(UploadReport {
            outcome,
            issue,
            revision,
        })
    }
}
