//! Error types for the review-intake CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for intake and upload operations.
///
/// Each variant maps to a specific exit code. `Submission`, `Upload` and
/// `MissingFile` end the run for one login without aborting a batch.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// User provided invalid arguments or the system is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The submission cannot be placed in the repository.
    #[error("{0}")]
    Submission(String),

    /// A file the intake needs does not exist.
    #[error("No such file: {0}")]
    MissingFile(String),

    /// Upload to the review service was refused or failed.
    #[error("{0}")]
    Upload(String),

    /// Git operation failed.
    #[error("Git operation failed: {0}")]
    GitError(String),

    /// Lock could not be acquired.
    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    /// The registry kept disagreeing with the filesystem after a reset.
    #[error("issue registry is out of sync with the repositories: {0}")]
    Drift(String),
}

impl IntakeError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            IntakeError::UserError(_) => exit_codes::USER_ERROR,
            IntakeError::Submission(_) => exit_codes::SUBMISSION_FAILURE,
            IntakeError::MissingFile(_) => exit_codes::USER_ERROR,
            IntakeError::Upload(_) => exit_codes::UPLOAD_FAILURE,
            IntakeError::GitError(_) => exit_codes::GIT_FAILURE,
            IntakeError::LockError(_) => exit_codes::LOCK_FAILURE,
            IntakeError::Drift(_) => exit_codes::USER_ERROR,
        }
    }

    /// True for the "file not found" condition, which is logged and skipped.
    pub fn is_skip(&self) -> bool {
        matches!(self, IntakeError::MissingFile(_))
    }

    /// True for failures that abandon one login's run but not the batch.
    pub fn is_reported(&self) -> bool {
        matches!(self, IntakeError::Submission(_) | IntakeError::Upload(_))
    }
}

/// Result type alias for intake operations.
pub type Result<T> = std::result::Result<T, IntakeError>;
