//! Implementation of the `review-intake add` command.
//!
//! Runs intake and upload for each login in turn while holding the intake
//! lock, since every run shares the scratch directory.

use crate::cli::AddArgs;
use crate::config::Config;
use crate::context::IntakeContext;
use crate::error::{IntakeError, Result};
use crate::fs::check_dir_name;
use crate::git::{GitCli, Vcs};
use crate::intake::Intake;
use crate::locks::acquire_intake_lock;
use crate::process::{ProcessRunner, SystemRunner};
use crate::registry::{FileRegistry, IssueRegistry};
use crate::upload::Uploader;

/// How a batch of logins went.
#[derive(Debug, Default)]
pub(super) struct BatchSummary {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, IntakeError)>,
}

impl BatchSummary {
    fn total(&self) -> usize {
        self.added.len() + self.skipped.len() + self.failed.len()
    }

    /// An error carrying the first failure's exit code, if any login failed.
    fn into_result(self) -> Result<()> {
        let total = self.total();
        let failed = self.failed.len();
        let Some((login, first)) = self.failed.into_iter().next() else {
            return Ok(());
        };

        let summary = format!(
            "{} of {} logins failed (first: {})",
            failed, total, login
        );
        Err(match first {
            IntakeError::Upload(_) => IntakeError::Upload(summary),
            _ => IntakeError::Submission(summary),
        })
    }
}

/// Execute the `review-intake add` command.
pub(super) fn cmd_add(ctx: &IntakeContext, config: &Config, args: AddArgs) -> Result<()> {
    check_dir_name("assignment", &args.assignment)?;
    let runner = SystemRunner;
    let vcs = GitCli::new(config.git_author_name.clone(), config.git_author_email.clone());
    let registry = FileRegistry::new(ctx);

    let subject = format!("{} {}", args.assignment, args.logins.join(" "));
    let lock = acquire_intake_lock(ctx, "add", &subject)?;

    let summary = add_logins(
        ctx,
        config,
        &runner,
        &vcs,
        &registry,
        &args.assignment,
        &args.logins,
        !args.no_upload,
    )?;
    lock.release()?;

    println!(
        "Added {}, skipped {}, failed {}.",
        summary.added.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    summary.into_result()
}

/// Add each login's submission, uploading it unless `upload` is false.
///
/// Skips and reported failures are printed and the batch continues; any
/// other error stops it.
#[allow(clippy::too_many_arguments)]
pub(super) fn add_logins(
    ctx: &IntakeContext,
    config: &Config,
    runner: &dyn ProcessRunner,
    vcs: &dyn Vcs,
    registry: &dyn IssueRegistry,
    assignment: &str,
    logins: &[String],
    upload: bool,
) -> Result<BatchSummary> {
    check_dir_name("assignment", assignment)?;
    let intake = Intake::new(ctx, config, runner, vcs, registry);
    let uploader = Uploader::new(ctx, config, runner, vcs, registry);
    let mut summary = BatchSummary::default();

    for login in logins {
        println!("Adding {} for {}", assignment, login);

        let result = intake.put_in_repo(login, assignment).and_then(|report| {
            if upload {
                uploader.upload(&report.repo_path, &report.participants, assignment)?;
            }
            Ok(())
        });

        match result {
            Ok(()) => summary.added.push(login.clone()),
            Err(e) if e.is_skip() => {
                eprintln!("ERROR: {}. Ignoring...", e);
                summary.skipped.push(login.clone());
            }
            Err(e) if e.is_reported() => {
                match &e {
                    IntakeError::Upload(_) => eprintln!("Error while uploading: {}", e),
                    _ => eprintln!("ERROR: {}", e),
                }
                summary.failed.push((login.clone(), e));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}
