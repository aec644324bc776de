//! Unpacking a submission into the scratch directory.

use crate::config::Config;
use crate::context::IntakeContext;
use crate::error::{IntakeError, Result};
use crate::fs::clear_dir;
use crate::process::{Invocation, ProcessOutput, ProcessRunner};
use std::path::PathBuf;

/// Marker the unpack tool prints when there is nothing to unpack.
const NO_SUCH_FILE: &str = "No such file";

/// How an unpack run ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnpackStatus {
    Clean,
    /// The tool succeeded but printed this to stderr.
    Warning(String),
}

/// Clear the scratch directory and unpack `login`'s `assignment` into it.
///
/// Returns the scratch directory.
pub(super) fn unpack_submission(
    ctx: &IntakeContext,
    config: &Config,
    runner: &dyn ProcessRunner,
    assignment: &str,
    login: &str,
) -> Result<PathBuf> {
    println!("Unpacking submission...");
    clear_dir(&ctx.temp_dir)?;

    let invocation =
        Invocation::from_command_line(&config.unpack_command, &[assignment, login], &ctx.temp_dir)?;
    let output = runner.run(&invocation)?;

    if let UnpackStatus::Warning(text) = classify_unpack_output(&output)? {
        eprintln!("Warning: `{}` reported: {}", invocation, text);
    }

    println!("Done unpacking.");
    Ok(ctx.temp_dir.clone())
}

/// Decide what the unpack tool's output means.
///
/// The tool signals problems through text rather than exit codes, so this is
/// the only place its output is inspected.
pub fn classify_unpack_output(output: &ProcessOutput) -> Result<UnpackStatus> {
    let stderr = output.stderr.trim();

    if let Some(line) = stderr.lines().find(|l| l.contains(NO_SUCH_FILE)) {
        return Err(IntakeError::MissingFile(line.trim().to_string()));
    }

    if !output.success() {
        let status = output
            .status
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        return Err(IntakeError::Submission(format!(
            "unpack tool failed (exit code {}): {}",
            status, stderr
        )));
    }

    if stderr.is_empty() {
        Ok(UnpackStatus::Clean)
    } else {
        Ok(UnpackStatus::Warning(stderr.to_string()))
    }
}
