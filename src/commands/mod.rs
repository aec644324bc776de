//! Command implementations for review-intake.
//!
//! This module loads the config, checks who is running the tool, and routes
//! CLI commands to their implementations.

mod add;
mod issue;
mod lock;

use crate::cli::{Cli, Command};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::context::IntakeContext;
use crate::error::{IntakeError, Result};
use crate::fs::check_dir_name;
use crate::participants::ParticipantSet;
use crate::registry::IssueKey;
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
///
/// Every command needs the config and runs only as `required_user` when one
/// is configured.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    check_required_user(&config, &current_user())?;
    let ctx = IntakeContext::from_config(&config)?;

    match cli.command {
        Command::Add(args) => add::cmd_add(&ctx, &config, args),
        Command::Issue(cmd) => issue::dispatch_issue(&ctx, cmd),
        Command::Lock(cmd) => lock::dispatch_lock(&ctx, &config, cmd),
    }
}

/// Load the config from `path`, or from `review-intake.yaml` in the current
/// directory when no path was given.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };

    if !path.exists() {
        return Err(IntakeError::UserError(format!(
            "config file not found: {}\n\n\
             Pass --config <path>, set REVIEW_INTAKE_CONFIG, or run from the directory \
             containing {}.",
            path.display(),
            DEFAULT_CONFIG_FILE
        )));
    }

    Config::load(&path)
}

/// Login of the user running the process.
fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default()
}

/// Refuse to run as anyone other than the configured user.
fn check_required_user(config: &Config, user: &str) -> Result<()> {
    match &config.required_user {
        Some(required) if required != user => Err(IntakeError::UserError(format!(
            "must be run as '{}' (currently '{}')",
            required, user
        ))),
        _ => Ok(()),
    }
}

/// Registry key for logins typed on the command line.
fn key_for(assignment: &str, logins: &[String]) -> Result<IssueKey> {
    check_dir_name("assignment", assignment)?;
    let participants = ParticipantSet::new(logins)?;
    Ok(IssueKey::new(&participants, assignment))
}
