//! Git command runner and version-control adapter.
//!
//! Provides a safe wrapper around git commands with captured stdout/stderr
//! and structured error handling, plus the [`Vcs`] seam the intake workflow
//! uses to init, stage, commit and inspect repositories.

use crate::error::{IntakeError, Result};
use std::path::Path;
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    /// Create a new GitOutput from raw output bytes.
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }
}

/// Run a git command with the specified working directory.
///
/// # Arguments
///
/// * `cwd` - The working directory to run the command in
/// * `args` - The git command arguments (without "git" prefix)
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(IntakeError::GitError)` - On non-zero exit code (mapped to exit code 3)
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            IntakeError::GitError(format!(
                "failed to execute git {}: {}",
                subcommand(args),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(IntakeError::GitError(format!(
            "git {} failed (exit code {}): {}",
            subcommand(args),
            exit_code,
            error_msg
        )))
    }
}

/// First argument that is not a `-c key=value` override.
fn subcommand<'a>(args: &[&'a str]) -> &'a str {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if *arg == "-c" {
            iter.next();
            continue;
        }
        return arg;
    }
    ""
}

/// Version-control operations the intake workflow needs.
pub trait Vcs {
    /// Create a repository in `path`.
    fn init(&self, path: &Path) -> Result<()>;

    /// Stage `paths`, or every change in the working tree when `None`.
    fn add(&self, paths: Option<&[&str]>, path: &Path) -> Result<()>;

    /// Commit what is staged.
    fn commit(&self, message: &str, path: &Path) -> Result<()>;

    /// Hash of the commit HEAD points at.
    fn revision_hash(&self, path: &Path) -> Result<String>;

    /// Returns true if `path` is the top of a working copy.
    fn is_repository(&self, path: &Path) -> bool;

    /// Returns true if the index differs from HEAD.
    fn has_staged_changes(&self, path: &Path) -> Result<bool>;
}

/// [`Vcs`] implemented with the git command line.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    author_name: Option<String>,
    author_email: Option<String>,
}

impl GitCli {
    /// A git adapter that commits with the given identity when set.
    pub fn new(author_name: Option<String>, author_email: Option<String>) -> Self {
        Self {
            author_name,
            author_email,
        }
    }

    fn identity_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();
        if let Some(name) = &self.author_name {
            overrides.push("-c".to_string());
            overrides.push(format!("user.name={}", name));
        }
        if let Some(email) = &self.author_email {
            overrides.push("-c".to_string());
            overrides.push(format!("user.email={}", email));
        }
        overrides
    }
}

impl Vcs for GitCli {
    fn init(&self, path: &Path) -> Result<()> {
        run_git(path, &["init", "--quiet"])?;
        Ok(())
    }

    fn add(&self, paths: Option<&[&str]>, path: &Path) -> Result<()> {
        let mut args = vec!["add"];
        match paths {
            Some(paths) => {
                args.push("--");
                args.extend_from_slice(paths);
            }
            None => args.push("-A"),
        }
        run_git(path, &args)?;
        Ok(())
    }

    fn commit(&self, message: &str, path: &Path) -> Result<()> {
        let overrides = self.identity_overrides();
        let mut args: Vec<&str> = overrides.iter().map(String::as_str).collect();
        args.extend(["commit", "--quiet", "-m", message]);

        run_git(path, &args).map_err(|e| {
            IntakeError::GitError(format!(
                "failed to commit in '{}': {}\n\n\
                 You may need to set git_author_name and git_author_email in the config.",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn revision_hash(&self, path: &Path) -> Result<String> {
        let output = run_git(path, &["rev-parse", "HEAD"])?;
        Ok(output.stdout)
    }

    fn is_repository(&self, path: &Path) -> bool {
        if !path.join(".git").exists() {
            return false;
        }
        run_git(path, &["rev-parse", "--is-inside-work-tree"])
            .map(|out| out.stdout == "true")
            .unwrap_or(false)
    }

    fn has_staged_changes(&self, path: &Path) -> Result<bool> {
        let staged = run_git(path, &["diff", "--cached", "--name-only"])?;
        Ok(!staged.is_empty())
    }
}
