//! Configuration types and defaults for review-intake.
//!
//! This module defines the nested upload settings and the default value
//! functions used by the Config struct.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the review-service upload script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Interpreter used to run the upload script.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Directory the review service client is installed in.
    #[serde(default = "default_code_review_dir")]
    pub code_review_dir: PathBuf,

    /// Upload script, relative to `code_review_dir` unless absolute.
    #[serde(default = "default_upload_script")]
    pub script: PathBuf,

    /// Host name of the review service.
    #[serde(default = "default_server")]
    pub server: String,

    /// Sender address for every upload.
    #[serde(default = "default_robot_email")]
    pub robot_email: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            code_review_dir: default_code_review_dir(),
            script: default_upload_script(),
            server: default_server(),
            robot_email: default_robot_email(),
        }
    }
}

impl UploadSettings {
    /// Full path of the upload script.
    pub fn script_path(&self) -> PathBuf {
        self.code_review_dir.join(&self.script)
    }
}

/// Placeholder written for template files the course does not provide.
pub const DEFAULT_PLACEHOLDER_TEXT: &str = "You were not given a template for this assignment.\n\
This is just placeholder text; nothing to freak out about :)\n";

// Default value functions for serde
pub(crate) fn default_temp_dir() -> PathBuf {
    PathBuf::from("tmp")
}
pub(crate) fn default_repo_root() -> PathBuf {
    PathBuf::from("repos")
}
pub(crate) fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}
pub(crate) fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}
pub(crate) fn default_unpack_command() -> String {
    "get-subm".to_string()
}
pub(crate) fn default_placeholder_text() -> String {
    DEFAULT_PLACEHOLDER_TEXT.to_string()
}
pub(crate) fn default_lock_stale_minutes() -> u32 {
    120
}
fn default_interpreter() -> String {
    "python2.7".to_string()
}
fn default_code_review_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_upload_script() -> PathBuf {
    PathBuf::from("61a-codereview/appengine/upload.py")
}
fn default_server() -> String {
    "berkeley-61a.appspot.com".to_string()
}
fn default_robot_email() -> String {
    "cs61a.robot@gmail.com".to_string()
}
