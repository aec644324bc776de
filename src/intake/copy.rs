//! Copying designated submission files into the repository.

use crate::config::Config;
use crate::error::{IntakeError, Result};
use crate::fs::{copy_file, remove_file};
use crate::student_files::{STUDENT_FILES, student_local_matcher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Error text for a tracked path that was submitted as a directory.
pub const DIRECTORY_SUBMISSION: &str = "turned in a directory that should be a file";

/// The assignment's important files followed by the student-local files.
pub fn designated_files(config: &Config, assignment: &str) -> Vec<String> {
    let mut files = config.important_files_for(assignment);
    for student_file in STUDENT_FILES {
        if !files.iter().any(|f| f == student_file) {
            files.push(student_file.to_string());
        }
    }
    files
}

/// Copy `files` from `submission_dir` into `repo_path`.
///
/// Every file is checked before anything is copied, so a rejected
/// submission leaves the repository untouched. A student-local file the
/// student did not turn in is removed from the repository, so nothing
/// downstream reads a copy left by an earlier submission. Returns the files
/// copied.
pub(super) fn copy_submission(
    submission_dir: &Path,
    repo_path: &Path,
    files: &[String],
) -> Result<Vec<String>> {
    let matcher = student_local_matcher()?;
    let mut plan: Vec<(&String, PathBuf)> = Vec::new();
    let mut withdrawn: Vec<&String> = Vec::new();

    for file in files {
        let source = submission_dir.join(file);
        match std::fs::metadata(&source) {
            Ok(meta) if meta.is_dir() => {
                return Err(IntakeError::Submission(format!(
                    "{}: '{}'",
                    DIRECTORY_SUBMISSION, file
                )));
            }
            Ok(_) => plan.push((file, source)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if !matcher.is_match(file) {
                    return Err(IntakeError::MissingFile(source.display().to_string()));
                }
                withdrawn.push(file);
            }
            Err(e) => {
                return Err(IntakeError::UserError(format!(
                    "failed to inspect '{}': {}",
                    source.display(),
                    e
                )));
            }
        }
    }

    for file in withdrawn {
        remove_file(&repo_path.join(file))?;
    }

    let mut copied = Vec::with_capacity(plan.len());
    for (file, source) in plan {
        copy_file(&source, &repo_path.join(file))?;
        copied.push(file.clone());
    }
    Ok(copied)
}
