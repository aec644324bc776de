//! CLI argument parsing for review-intake.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::CONFIG_ENV_VAR;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// review-intake: move student submissions into per-group repositories and
/// upload them to the code review service.
///
/// Each repository lives at `<repo_root>/<sorted logins>/<assignment>/` and
/// is tracked by one review issue, recorded in the issue registry.
#[derive(Parser, Debug)]
#[command(name = "review-intake")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file [default: review-intake.yaml]
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for review-intake.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add the latest submission of each login and upload it.
    ///
    /// Logins are processed in order. A login without a submission is
    /// skipped; a bad submission or a failed upload is reported and the
    /// batch moves on.
    Add(AddArgs),

    /// Issue registry maintenance.
    ///
    /// Show, record or forget the review issue of a repository.
    Issue(IssueCommand),

    /// Lock management commands.
    ///
    /// List or clear the intake and registry locks.
    Lock(LockCommand),
}

/// Arguments for the `add` command.
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Assignment to add (e.g., hw1, proj2).
    pub assignment: String,

    /// Logins whose submissions to add.
    #[arg(required = true)]
    pub logins: Vec<String>,

    /// Commit the submission without uploading it.
    #[arg(long)]
    pub no_upload: bool,
}

/// Issue subcommands.
#[derive(Parser, Debug)]
pub struct IssueCommand {
    #[command(subcommand)]
    pub action: IssueAction,
}

/// Available issue actions.
#[derive(Subcommand, Debug)]
pub enum IssueAction {
    /// List every recorded issue.
    List,

    /// Show the issue recorded for a group.
    Show(IssueShowArgs),

    /// Record the issue of a group, replacing any previous one.
    Set(IssueSetArgs),

    /// Forget the issue of a group.
    ///
    /// The next intake rebuilds the repository from the template, so this
    /// requires --force.
    Clear(IssueClearArgs),
}

/// Arguments for `issue show`.
#[derive(Parser, Debug)]
pub struct IssueShowArgs {
    /// Assignment name.
    pub assignment: String,

    /// Logins of the group, in any order.
    #[arg(required = true)]
    pub logins: Vec<String>,
}

/// Arguments for `issue set`.
#[derive(Parser, Debug)]
pub struct IssueSetArgs {
    /// Assignment name.
    pub assignment: String,

    /// Issue number on the review service.
    pub issue: u64,

    /// Logins of the group, in any order.
    #[arg(required = true)]
    pub logins: Vec<String>,
}

/// Arguments for `issue clear`.
#[derive(Parser, Debug)]
pub struct IssueClearArgs {
    /// Assignment name.
    pub assignment: String,

    /// Logins of the group, in any order.
    #[arg(required = true)]
    pub logins: Vec<String>,

    /// Confirm the removal.
    #[arg(long)]
    pub force: bool,
}

/// Lock subcommands.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Available lock actions.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// List all active locks.
    ///
    /// Shows the intake and registry locks with their age and owner.
    List,

    /// Clear a specific lock.
    ///
    /// Requires --force flag to prevent accidental clearing.
    Clear(LockClearArgs),
}

/// Arguments for the `lock clear` command.
#[derive(Parser, Debug)]
pub struct LockClearArgs {
    /// Lock to clear: "intake" or "registry".
    pub name: String,

    /// Force clearing the lock (required for safety).
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_add() {
        let cli =
            Cli::try_parse_from(["review-intake", "add", "proj1", "cs61a-ab", "cs61a-cd"]).unwrap();
        if let Command::Add(args) = cli.command {
            assert_eq!(args.assignment, "proj1");
            assert_eq!(args.logins, vec!["cs61a-ab", "cs61a-cd"]);
            assert!(!args.no_upload);
        } else {
            panic!("Expected Add command");
        }
    }

    #[test]
    fn parse_add_requires_a_login() {
        assert!(Cli::try_parse_from(["review-intake", "add", "proj1"]).is_err());
    }

    #[test]
    fn parse_add_no_upload() {
        let cli =
            Cli::try_parse_from(["review-intake", "add", "hw1", "cs61a-ab", "--no-upload"]).unwrap();
        if let Command::Add(args) = cli.command {
            assert!(args.no_upload);
        } else {
            panic!("Expected Add command");
        }
    }

    #[test]
    fn parse_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "review-intake",
            "lock",
            "list",
            "--config",
            "/srv/cr/review-intake.yaml",
        ])
        .unwrap();
        assert_eq!(
            cli.config,
            Some(PathBuf::from("/srv/cr/review-intake.yaml"))
        );
    }

    #[test]
    #[serial]
    fn config_falls_back_to_env_var() {
        // SAFETY: serialized with every other test that reads the environment
        unsafe { std::env::set_var(CONFIG_ENV_VAR, "/etc/review-intake.yaml") };
        let cli = Cli::try_parse_from(["review-intake", "issue", "list"]);
        unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

        assert_eq!(
            cli.unwrap().config,
            Some(PathBuf::from("/etc/review-intake.yaml"))
        );
    }

    #[test]
    fn parse_issue_set() {
        let cli = Cli::try_parse_from([
            "review-intake",
            "issue",
            "set",
            "proj1",
            "42",
            "cs61a-cd",
            "cs61a-ab",
        ])
        .unwrap();
        if let Command::Issue(cmd) = cli.command
            && let IssueAction::Set(args) = cmd.action
        {
            assert_eq!(args.assignment, "proj1");
            assert_eq!(args.issue, 42);
            assert_eq!(args.logins, vec!["cs61a-cd", "cs61a-ab"]);
        } else {
            panic!("Expected Issue Set command");
        }
    }

    #[test]
    fn parse_issue_set_rejects_non_numeric_issue() {
        let result =
            Cli::try_parse_from(["review-intake", "issue", "set", "proj1", "abc", "cs61a-ab"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_issue_clear() {
        let cli = Cli::try_parse_from([
            "review-intake",
            "issue",
            "clear",
            "hw1",
            "cs61a-ab",
            "--force",
        ])
        .unwrap();
        if let Command::Issue(cmd) = cli.command
            && let IssueAction::Clear(args) = cmd.action
        {
            assert_eq!(args.logins, vec!["cs61a-ab"]);
            assert!(args.force);
        } else {
            panic!("Expected Issue Clear command");
        }
    }

    #[test]
    fn parse_lock_clear() {
        let cli =
            Cli::try_parse_from(["review-intake", "lock", "clear", "intake", "--force"]).unwrap();
        if let Command::Lock(lock_cmd) = cli.command
            && let LockAction::Clear(args) = lock_cmd.action
        {
            assert_eq!(args.name, "intake");
            assert!(args.force);
        } else {
            panic!("Expected Lock Clear command");
        }
    }
}
