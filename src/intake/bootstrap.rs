//! Creating repositories from the template and checking registered ones.

use super::Intake;
use crate::error::{IntakeError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::fs::{clear_dir, copy_file, ensure_dir};
use crate::registry::IssueKey;
use crate::student_files::{IGNORE_PATTERN, student_local_matcher};
use serde_json::json;
use std::path::Path;

/// Message of the first commit in every repository.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// How many times a stale registry entry is reset before giving up.
pub const MAX_DRIFT_RETRIES: usize = 1;

/// Result of [`Intake::bootstrap_or_verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
    /// A new repository was created from the template.
    Bootstrapped,
    /// The registered repository exists.
    Verified,
}

impl Intake<'_> {
    /// Make sure `repo_path` holds a repository consistent with the registry.
    ///
    /// No registry entry means the group has never been uploaded, so the
    /// repository is rebuilt from the template. An entry whose repository is
    /// gone is removed and the check starts over.
    pub(super) fn bootstrap_or_verify(
        &self,
        key: &IssueKey,
        repo_path: &Path,
        assignment: &str,
    ) -> Result<RepoState> {
        let mut resets = 0;
        loop {
            let Some(issue) = self.registry.get(key)? else {
                self.bootstrap(key, repo_path, assignment)?;
                return Ok(RepoState::Bootstrapped);
            };

            if self.vcs.is_repository(repo_path) {
                return Ok(RepoState::Verified);
            }

            if resets == MAX_DRIFT_RETRIES {
                return Err(IntakeError::Drift(format!(
                    "issue {} is still recorded for {} but '{}' is not a repository",
                    issue,
                    key,
                    repo_path.display()
                )));
            }
            resets += 1;

            println!(
                "Issue {} recorded for {}, but there is no repository at '{}'. Resetting issue number...",
                issue,
                key,
                repo_path.display()
            );
            let removed = self.registry.remove(key, issue)?;
            append_event(
                self.ctx,
                &Event::new(EventAction::DriftReset)
                    .with_subject(key.to_string())
                    .with_details(json!({ "issue": issue, "removed": removed })),
            )?;
        }
    }

    /// Rebuild `repo_path` from the template and make the initial commit.
    fn bootstrap(&self, key: &IssueKey, repo_path: &Path, assignment: &str) -> Result<()> {
        println!("Creating repository for {} from the template.", key);
        clear_dir(repo_path)?;

        let template_path = self.ctx.template_path(assignment);
        let matcher = student_local_matcher()?;
        let mut placeholders = Vec::new();

        for file in self.config.important_files_for(assignment) {
            if matcher.is_match(&file) {
                continue;
            }
            let source = template_path.join(&file);
            let destination = repo_path.join(&file);

            if source.is_file() {
                copy_file(&source, &destination)?;
            } else if source.exists() {
                return Err(IntakeError::UserError(format!(
                    "template '{}' is not a regular file",
                    source.display()
                )));
            } else {
                write_file(&destination, &self.config.placeholder_text)?;
                placeholders.push(file);
            }
        }

        self.vcs.init(repo_path)?;
        write_file(&repo_path.join(".gitignore"), &format!("{}\n", IGNORE_PATTERN))?;
        self.vcs.add(None, repo_path)?;
        self.vcs.commit(INITIAL_COMMIT_MESSAGE, repo_path)?;

        append_event(
            self.ctx,
            &Event::new(EventAction::Bootstrap)
                .with_subject(key.to_string())
                .with_details(json!({
                    "template": template_path.display().to_string(),
                    "placeholders": placeholders,
                })),
        )
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(path, content).map_err(|e| {
        IntakeError::UserError(format!("failed to write '{}': {}", path.display(), e))
    })
}
