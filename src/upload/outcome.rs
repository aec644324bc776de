//! Reading the upload script's output.

use crate::error::{IntakeError, Result};
use crate::process::ProcessOutput;
use regex::Regex;
use std::sync::LazyLock;

/// Printed to stderr by the upload script when it crashes.
const UNHANDLED_EXCEPTION: &str = "Unhandled exception";

/// `Issue created. URL: http://server/<id>`; `id` is the text after the last `/`.
static ISSUE_CREATED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Issue created(?:.*/(?P<id>[^/]*))?").expect("Invalid issue created regex")
});

/// What the review service did with an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// A new issue was opened with this id.
    Created { issue: u64 },
    /// A new patch set was added to an existing issue.
    Updated,
}

/// Turn the script's captured output into an [`UploadOutcome`].
///
/// The script reports through text, so this is the only place that scans it.
pub fn interpret_upload_output(output: &ProcessOutput) -> Result<UploadOutcome> {
    if output.stderr.contains(UNHANDLED_EXCEPTION) {
        return Err(IntakeError::Upload(output.stderr.clone()));
    }

    for line in output.stdout.lines() {
        let line = line.trim_end();
        if let Some(caps) = ISSUE_CREATED_REGEX.captures(line) {
            // Without a `/` the whole line is the id, which never parses
            let segment = caps.name("id").map_or(line, |m| m.as_str().trim());
            return match segment.parse::<u64>() {
                Ok(issue) if issue > 0 => Ok(UploadOutcome::Created { issue }),
                _ => Err(IntakeError::Upload(format!(
                    "could not read an issue number from '{}'",
                    line.trim()
                ))),
            };
        }
    }

    if !output.success() {
        let status = output
            .status
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        return Err(IntakeError::Upload(format!(
            "upload script failed (exit code {}): {}",
            status,
            output.stderr.trim()
        )));
    }

    Ok(UploadOutcome::Updated)
}
