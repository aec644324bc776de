//! Participant sets: the student or partner group one repository belongs to.

use crate::error::{IntakeError, Result};
use crate::fs::check_dir_name;
use crate::student_files;
use std::fmt;
use std::path::Path;

/// A non-empty, sorted, duplicate-free set of logins.
///
/// The sorted form is the identity of a group: it names the repository
/// directory and keys the issue registry, so the order logins were typed in
/// never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantSet {
    logins: Vec<String>,
}

impl ParticipantSet {
    /// Build a set from logins in any order.
    ///
    /// Blank entries are dropped. An empty result, or a login that is not a
    /// plain directory name, is a `UserError`.
    pub fn new<I, S>(logins: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut logins: Vec<String> = logins
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        for login in &logins {
            check_dir_name("login", login)?;
        }
        logins.sort();
        logins.dedup();

        if logins.is_empty() {
            return Err(IntakeError::UserError(
                "a participant set needs at least one login".to_string(),
            ));
        }

        Ok(Self { logins })
    }

    /// Read the partners file in a submission directory, falling back to
    /// `login` alone when the file is absent or empty.
    ///
    /// The partners file is written by the student, so a bad entry rejects
    /// the submission rather than the whole run.
    pub fn from_submission(dir: &Path, login: &str) -> Result<Self> {
        let partners = student_files::read_partners(dir)?;
        if partners.is_empty() {
            return Self::new([login]);
        }
        Self::new(partners).map_err(|e| match e {
            IntakeError::UserError(msg) => {
                IntakeError::Submission(format!("{}: {}", student_files::PARTNERS_FILE, msg))
            }
            other => other,
        })
    }

    /// The sorted logins.
    pub fn logins(&self) -> &[String] {
        &self.logins
    }

    /// Concatenated sorted logins, used as the repository directory name.
    pub fn canonical_name(&self) -> String {
        self.logins.concat()
    }
}

impl fmt::Display for ParticipantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.logins.join(","))
    }
}
