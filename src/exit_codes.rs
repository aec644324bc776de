//! Exit code constants for the review-intake CLI.
//!
//! - 0: Success (including logins skipped because a file was missing)
//! - 1: User error (bad args, bad config, registry drift)
//! - 2: Submission failure (unpack failed, directory turned in as a file)
//! - 3: Git operation failure
//! - 4: Lock acquisition failure
//! - 5: Upload failure (no recipients, upload tool raised)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration or state.
pub const USER_ERROR: i32 = 1;

/// Submission failure: the unpacked submission cannot be placed in the repository.
pub const SUBMISSION_FAILURE: i32 = 2;

/// Git operation failure: init, add, commit or rev-parse errors.
pub const GIT_FAILURE: i32 = 3;

/// Lock acquisition failure: the intake or registry lock is held elsewhere.
pub const LOCK_FAILURE: i32 = 4;

/// Upload failure: nobody to send the review to, or the upload tool failed.
pub const UPLOAD_FAILURE: i32 = 5;
