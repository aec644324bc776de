//! External process runner.
//!
//! Every non-git tool the intake touches (the unpack tool, the upload script,
//! `chown`) goes through [`ProcessRunner`] so the workflows can be driven by a
//! scripted fake in tests. Each [`Invocation`] carries its own working
//! directory; the process-wide current directory is never changed.

use crate::error::{IntakeError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments, passed without a shell.
    pub args: Vec<String>,
    /// Working directory for the command.
    pub cwd: PathBuf,
}

impl Invocation {
    /// Create an invocation from a program and its arguments.
    pub fn new<S: Into<String>>(program: S, args: Vec<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.to_path_buf(),
        }
    }

    /// Split a configured command line with shell-words and append `extra_args`.
    pub fn from_command_line(line: &str, extra_args: &[&str], cwd: &Path) -> Result<Self> {
        let mut words = shell_words::split(line).map_err(|e| {
            IntakeError::UserError(format!(
                "failed to parse command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                line, e
            ))
        })?;

        if words.is_empty() {
            return Err(IntakeError::UserError(format!(
                "command is empty after parsing: '{}'",
                line
            )));
        }

        let program = words.remove(0);
        words.extend(extra_args.iter().map(|a| a.to_string()));
        Ok(Self::new(program, words, cwd))
    }
}

#[cfg(test)]
impl Invocation {
    /// Returns true if any argument equals `arg`.
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// The argument following `flag`, if present.
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        write!(f, "{}", shell_words::join(words))
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Exit code (None if killed by a signal).
    pub status: Option<i32>,
}

impl ProcessOutput {
    /// Returns true if the command exited with code 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

#[cfg(test)]
impl ProcessOutput {
    /// A successful run with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            status: Some(0),
        }
    }

    /// A run that exited with `status` and printed `stderr`.
    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            status: Some(status),
        }
    }

    /// Attach stderr text to an output.
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }
}

/// Runs external commands to completion.
pub trait ProcessRunner {
    /// Run `invocation` and capture its output.
    ///
    /// A non-zero exit is not an error here; only a failure to start the
    /// command is.
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .output()
            .map_err(|e| {
                IntakeError::UserError(format!(
                    "failed to execute '{}' in '{}': {}\n\
                     Fix: ensure the command is installed and in PATH.",
                    invocation.program,
                    invocation.cwd.display(),
                    e
                ))
            })?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        })
    }
}
