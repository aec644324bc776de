//! Submission intake: from a login's latest submission to a committed repository.
//!
//! One run of [`Intake::put_in_repo`] goes through these steps:
//!
//! 1. Unpack the submission into the scratch directory ([`unpack`])
//! 2. Resolve the participant set from the submitted partners file
//! 3. Bootstrap the repository from the template, or verify that the
//!    registered one still exists ([`bootstrap`])
//! 4. Copy the designated files into the repository ([`copy`])
//! 5. Commit, unless nothing changed
//! 6. Drop the scratch directory and grant staff access to the content
//!
//! Every collaborator that touches the outside world is passed in, and every
//! external command carries its own working directory.

mod bootstrap;
mod copy;
mod unpack;


pub use bootstrap::{INITIAL_COMMIT_MESSAGE, MAX_DRIFT_RETRIES, RepoState};
pub use copy::{DIRECTORY_SUBMISSION, designated_files};
pub use unpack::{UnpackStatus, classify_unpack_output};

use crate::config::Config;
use crate::context::IntakeContext;
use crate::error::Result;
use crate::events::{Event, EventAction, append_event};
use crate::fs::{ensure_dir, remove_dir};
use crate::git::Vcs;
use crate::participants::ParticipantSet;
use crate::permissions;
use crate::process::ProcessRunner;
use crate::registry::{IssueKey, IssueRegistry};
use crate::timestamp;
use serde_json::json;
use std::path::PathBuf;

/// What one intake run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeReport {
    /// `<repo_root>/<canonical logins>/<assignment>/`
    pub repo_path: PathBuf,
    /// Sorted participants the repository belongs to.
    pub participants: ParticipantSet,
    /// True if the repository was created from the template in this run.
    pub bootstrapped: bool,
    /// False when the submission matched the last commit.
    pub committed: bool,
}

/// The intake workflow and its collaborators.
pub struct Intake<'a> {
    ctx: &'a IntakeContext,
    config: &'a Config,
    runner: &'a dyn ProcessRunner,
    vcs: &'a dyn Vcs,
    registry: &'a dyn IssueRegistry,
}

impl<'a> Intake<'a> {
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

    /// Place `login`'s latest `assignment` submission in its repository.
    ///
    /// # Errors
    ///
    /// * `MissingFile` - the submission or an assignment file does not exist
    /// * `Submission` - the unpack tool failed or a tracked path is a directory
    /// * `Drift` - the registry kept pointing at a missing repository
    /// * `GitError`, `UserError` - anything else
    pub fn put_in_repo(&self, login: &str, assignment: &str) -> Result<IntakeReport> {
        let submission_dir = unpack::unpack_submission(
            self.ctx,
            self.config,
            self.runner,
            assignment,
            login,
        )?;

        let participants = ParticipantSet::from_submission(&submission_dir, login)?;
        let repo_path = self.ctx.repository_path(&participants, assignment)?;
        ensure_dir(&repo_path)?;

        let key = IssueKey::new(&participants, assignment);
        let state = self.bootstrap_or_verify(&key, &repo_path, assignment)?;

        let files = designated_files(self.config, assignment);
        let copied = copy::copy_submission(&submission_dir, &repo_path, &files)?;

        self.vcs.add(None, &repo_path)?;
        let committed = self.vcs.has_staged_changes(&repo_path)?;
        if committed {
            let message = format!("{} commit of code", timestamp::now());
            self.vcs.commit(&message, &repo_path)?;
        } else {
            println!("No changes since the last submission; nothing to commit.");
        }

        remove_dir(&submission_dir)?;
        permissions::grant_staff_access(&repo_path, self.config, self.runner)?;

        append_event(
            self.ctx,
            &Event::new(EventAction::Intake)
                .with_subject(key.to_string())
                .with_details(json!({
                    "login": login,
                    "participants": participants.logins(),
                    "files": copied,
                    "bootstrapped": state == RepoState::Bootstrapped,
                    "committed": committed,
                })),
        )?;

        Ok(IntakeReport {
            repo_path,
            participants,
            bootstrapped: state == RepoState::Bootstrapped,
            committed,
        })
    }
}
