//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for review-intake.
///
/// This struct represents the contents of `review-intake.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Directory layout
    // =========================================================================
    /// Scratch directory submissions are unpacked into.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Root of the per-group repositories.
    #[serde(default = "default_repo_root")]
    pub repo_root: PathBuf,

    /// Starter files, split into `hw/` and `projects/`.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Issue registry, events and locks live here.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    // =========================================================================
    // External tools
    // =========================================================================
    /// Command that unpacks a submission; `<assignment> <login>` are appended.
    #[serde(default = "default_unpack_command")]
    pub unpack_command: String,

    /// Review-service upload settings.
    #[serde(default)]
    pub upload: UploadSettings,

    // =========================================================================
    // Course data
    // =========================================================================
    /// Files tracked for each (clean) assignment name.
    #[serde(default)]
    pub important_files: BTreeMap<String, Vec<String>>,

    /// Maps raw assignment names onto the clean names used above.
    #[serde(default)]
    pub assignment_aliases: BTreeMap<String, String>,

    /// Reviewer addresses for each section number.
    #[serde(default)]
    pub section_reviewers: BTreeMap<String, Vec<String>>,

    /// Text written for template files that do not exist.
    #[serde(default = "default_placeholder_text")]
    pub placeholder_text: String,

    // =========================================================================
    // Ownership and identity
    // =========================================================================
    /// Group that must own repository content after every intake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_group: Option<String>,

    /// User that must own repository content after every intake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_owner: Option<String>,

    /// Only this user may run the tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_user: Option<String>,

    /// Committer name passed to git.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_author_name: Option<String>,

    /// Committer email passed to git.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_author_email: Option<String>,

    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Minutes after which a lock is considered stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            repo_root: default_repo_root(),
            template_dir: default_template_dir(),
            state_dir: default_state_dir(),
            unpack_command: default_unpack_command(),
            upload: UploadSettings::default(),
            important_files: BTreeMap::new(),
            assignment_aliases: BTreeMap::new(),
            section_reviewers: BTreeMap::new(),
            placeholder_text: default_placeholder_text(),
            staff_group: None,
            staff_owner: None,
            required_user: None,
            git_author_name: None,
            git_author_email: None,
            lock_stale_minutes: default_lock_stale_minutes(),
        }
    }
}
