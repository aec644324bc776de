//! Directory layout resolution for review-intake.
//!
//! Every command resolves one `IntakeContext` from the loaded config and uses
//! it to find the scratch directory, the per-group repositories, the template
//! tree, and the state directory holding the issue registry, events and locks.
//! Nothing in the crate derives these paths on its own.

use crate::config::Config;
use crate::error::{IntakeError, Result};
use crate::fs::check_dir_name;
use crate::participants::ParticipantSet;
use std::env;
use std::path::{Path, PathBuf};

/// Name of the events directory within the state directory.
pub const EVENTS_DIR: &str = "events";

/// Name of the locks directory within the state directory.
pub const LOCKS_DIR: &str = "locks";

/// File name of the issue registry within the state directory.
pub const REGISTRY_FILE: &str = "registry.json";

/// Which template subtree an assignment bootstraps from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Homework assignments (`templates/hw/`).
    Hw,
    /// Everything else (`templates/projects/`).
    Projects,
}

impl TemplateKind {
    /// Pick the template subtree for an assignment name.
    pub fn for_assignment(assignment: &str) -> Self {
        if assignment.contains("hw") {
            TemplateKind::Hw
        } else {
            TemplateKind::Projects
        }
    }

    /// Directory name of the subtree.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Hw => "hw",
            TemplateKind::Projects => "projects",
        }
    }
}

/// Resolved paths for one review-intake run.
///
/// All paths are absolute.
#[derive(Debug, Clone)]
pub struct IntakeContext {
    /// Scratch directory submissions are unpacked into.
    pub temp_dir: PathBuf,

    /// Root of the per-group repositories.
    pub repo_root: PathBuf,

    /// Root of the template tree.
    pub template_dir: PathBuf,

    /// Directory holding the registry, events and locks.
    pub state_dir: PathBuf,

    /// Lock files (`{state_dir}/locks/`).
    pub locks_dir: PathBuf,
}

impl IntakeContext {
    /// Resolve the context from a loaded config.
    ///
    /// Relative directories are anchored at the current working directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            IntakeError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Ok(Self::from_config_in(config, &cwd))
    }

    /// Resolve the context from a config, anchoring relative paths at `base`.
    pub fn from_config_in(config: &Config, base: &Path) -> Self {
        let absolute = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };

        let state_dir = absolute(&config.state_dir);
        let locks_dir = state_dir.join(LOCKS_DIR);

        Self {
            temp_dir: absolute(&config.temp_dir),
            repo_root: absolute(&config.repo_root),
            template_dir: absolute(&config.template_dir),
            state_dir,
            locks_dir,
        }
    }

    /// Repository path for a participant set: `{repo_root}/{sorted logins}/{assignment}/`.
    ///
    /// Fails with `UserError` unless the result lies inside `repo_root`.
    pub fn repository_path(
        &self,
        participants: &ParticipantSet,
        assignment: &str,
    ) -> Result<PathBuf> {
        check_dir_name("assignment", assignment)?;
        let group = participants.canonical_name();
        check_dir_name("participant set", &group)?;

        let path = self.repo_root.join(group).join(assignment);
        if !path.starts_with(&self.repo_root) {
            return Err(IntakeError::UserError(format!(
                "repository path '{}' is outside '{}'",
                path.display(),
                self.repo_root.display()
            )));
        }
        Ok(path)
    }

    /// Template subtree for an assignment.
    pub fn template_path(&self, assignment: &str) -> PathBuf {
        self.template_dir
            .join(TemplateKind::for_assignment(assignment).as_str())
    }

    /// Get the path to the issue registry file.
    pub fn registry_path(&self) -> PathBuf {
        self.state_dir.join(REGISTRY_FILE)
    }

    /// Get the path to the events directory.
    pub fn events_dir(&self) -> PathBuf {
        self.state_dir.join(EVENTS_DIR)
    }

    /// Get the path to the main events log file.
    pub fn events_file(&self) -> PathBuf {
        self.events_dir().join("events.ndjson")
    }

    /// Get the path to the intake lock file.
    pub fn intake_lock_path(&self) -> PathBuf {
        self.locks_dir.join("intake.lock")
    }

    /// Get the path to the registry lock file.
    pub fn registry_lock_path(&self) -> PathBuf {
        self.locks_dir.join("registry.lock")
    }
}
