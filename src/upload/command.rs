//! Building the upload script command line.

use crate::config::UploadSettings;
use crate::process::Invocation;
use std::path::Path;

/// One request to the review service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    /// Open a private issue titled with the assignment, mailed to `recipients`.
    NewIssue {
        title: String,
        recipients: Vec<String>,
    },
    /// Add a patch set to `issue`, titled with the upload time.
    UpdateIssue { issue: u64, title: String },
}

impl UploadRequest {
    /// The upload script invocation for this request at `revision`.
    pub fn invocation(
        &self,
        settings: &UploadSettings,
        revision: &str,
        repo_path: &Path,
    ) -> Invocation {
        let title = match self {
            UploadRequest::NewIssue { title, .. } | UploadRequest::UpdateIssue { title, .. } => {
                title
            }
        };

        let mut args = vec![
            settings.script_path().to_string_lossy().into_owned(),
            "-s".to_string(),
            settings.server.clone(),
            "-t".to_string(),
            title.clone(),
        ];

        match self {
            UploadRequest::NewIssue { recipients, .. } => {
                args.push("-r".to_string());
                args.push(recipients.join(","));
                args.push("-e".to_string());
                args.push(settings.robot_email.clone());
            }
            UploadRequest::UpdateIssue { issue, .. } => {
                args.push("-e".to_string());
                args.push(settings.robot_email.clone());
                args.push("-i".to_string());
                args.push(issue.to_string());
            }
        }

        args.extend(
            ["--rev", revision, "--private", "--send_mail"]
                .iter()
                .map(|a| a.to_string()),
        );

        Invocation::new(settings.interpreter.clone(), args, repo_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings() -> UploadSettings {
        UploadSettings {
            code_review_dir: PathBuf::from("/home/cs61a/code_review"),
            ..UploadSettings::default()
        }
    }

    #[test]
    fn test_new_issue_command_line() {
        let request = UploadRequest::NewIssue {
            title: "proj1".to_string(),
            recipients: vec!["ab@gmail.com".to_string(), "reader@berkeley.edu".to_string()],
        };

        let inv = request.invocation(&settings(), "abc123", Path::new("/repos/cs61a-ab/proj1"));

        assert_eq!(inv.program, "python2.7");
        assert_eq!(
            inv.args,
            vec![
                "/home/cs61a/code_review/61a-codereview/appengine/upload.py",
                "-s",
                "berkeley-61a.appspot.com",
                "-t",
                "proj1",
                "-r",
                "ab@gmail.com,reader@berkeley.edu",
                "-e",
                "cs61a.robot@gmail.com",
                "--rev",
                "abc123",
                "--private",
                "--send_mail",
            ]
        );
        assert_eq!(inv.cwd, Path::new("/repos/cs61a-ab/proj1"));
        assert!(!inv.has_arg("-i"));
    }

    #[test]
    fn test_update_issue_command_line() {
        let request = UploadRequest::UpdateIssue {
            issue: 42,
            title: "2024-09-14 16:02:11".to_string(),
        };

        let inv = request.invocation(&settings(), "def456", Path::new("/repo"));

        assert_eq!(
            inv.args,
            vec![
                "/home/cs61a/code_review/61a-codereview/appengine/upload.py",
                "-s",
                "berkeley-61a.appspot.com",
                "-t",
                "2024-09-14 16:02:11",
                "-e",
                "cs61a.robot@gmail.com",
                "-i",
                "42",
                "--rev",
                "def456",
                "--private",
                "--send_mail",
            ]
        );
        assert!(!inv.has_arg("-r"));
        assert!(inv.to_string().contains("-t '2024-09-14 16:02:11'"));
    }
}
