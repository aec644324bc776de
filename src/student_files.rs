//! Student-local config files captured at submit time.
//!
//! Students turn in three plain-text files next to their code: their review
//! service addresses, their section numbers and their partners' logins. They
//! are copied into the repository so the upload can read them, but they are
//! never tracked by git.

use crate::error::{IntakeError, Result};
use globset::{Glob, GlobMatcher};
use std::io::ErrorKind;
use std::path::Path;

/// Review-service addresses of the student and partners.
pub const GMAILS_FILE: &str = "MY.GMAILS";

/// Section numbers of the student and partners.
pub const SECTIONS_FILE: &str = "MY.SECTIONS";

/// Logins of the student and partners.
pub const PARTNERS_FILE: &str = "MY.PARTNERS";

/// The three files, in the order they are copied.
pub const STUDENT_FILES: [&str; 3] = [GMAILS_FILE, SECTIONS_FILE, PARTNERS_FILE];

/// Ignore rule installed in every repository.
pub const IGNORE_PATTERN: &str = "MY.*";

/// Matcher for file names covered by [`IGNORE_PATTERN`].
pub fn student_local_matcher() -> Result<GlobMatcher> {
    Glob::new(IGNORE_PATTERN)
        .map(|g| g.compile_matcher())
        .map_err(|e| {
            IntakeError::UserError(format!(
                "invalid ignore pattern '{}': {}",
                IGNORE_PATTERN, e
            ))
        })
}

/// Whitespace-separated tokens of a file; an absent file has none.
pub fn read_tokens(path: &Path) -> Result<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content.split_whitespace().map(str::to_string).collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(IntakeError::UserError(format!(
            "failed to read '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Review-service addresses recorded in `dir`.
pub fn read_gmails(dir: &Path) -> Result<Vec<String>> {
    read_tokens(&dir.join(GMAILS_FILE))
}

/// Partner logins recorded in `dir`.
pub fn read_partners(dir: &Path) -> Result<Vec<String>> {
    read_tokens(&dir.join(PARTNERS_FILE))
}

/// Section numbers recorded in `dir`, normalized with [`normalize_section`].
pub fn read_sections(dir: &Path) -> Result<Vec<String>> {
    Ok(read_tokens(&dir.join(SECTIONS_FILE))?
        .iter()
        .map(|s| normalize_section(s))
        .collect())
}

/// Legacy three-character section codes carry a prefix character; drop it.
pub fn normalize_section(section: &str) -> String {
    if section.chars().count() == 3 {
        section.chars().skip(1).collect()
    } else {
        section.to_string()
    }
}
