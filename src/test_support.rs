//! Shared test fixtures: git repositories, a scripted process runner and a
//! temporary intake layout with config and context.

use crate::config::Config;
use crate::context::IntakeContext;
use crate::events::Event;
use crate::git::GitCli;
use crate::process::{Invocation, ProcessOutput, ProcessRunner};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

pub(crate) const TEST_NAME: &str = "Test User";
pub(crate) const TEST_EMAIL: &str = "test@example.com";

pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    git(path, &["config", "user.email", TEST_EMAIL]);
    git(path, &["config", "user.name", TEST_NAME]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

/// Git adapter with a fixed identity so commits work on bare CI machines.
pub(crate) fn test_git() -> GitCli {
    GitCli::new(Some(TEST_NAME.to_string()), Some(TEST_EMAIL.to_string()))
}

/// Run git in `repo_dir`, panicking on failure, and return trimmed stdout.
pub(crate) fn git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Commit subjects of `repo_dir`, oldest first.
pub(crate) fn commit_subjects(repo_dir: &Path) -> Vec<String> {
    git(repo_dir, &["log", "--reverse", "--format=%s"])
        .lines()
        .map(str::to_string)
        .collect()
}

/// Files tracked at HEAD in `repo_dir`, sorted.
pub(crate) fn tracked_files(repo_dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = git(repo_dir, &["ls-files"])
        .lines()
        .map(str::to_string)
        .collect();
    files.sort();
    files
}

/// Every event logged so far, in order.
pub(crate) fn read_events(ctx: &IntakeContext) -> Vec<Event> {
    let Ok(content) = std::fs::read_to_string(ctx.events_file()) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

type Responder = Box<dyn Fn(&Invocation) -> ProcessOutput + Send>;

/// Scripted [`ProcessRunner`] that records every invocation.
///
/// Programs without a responder succeed with empty output.
#[derive(Default)]
pub(crate) struct FakeRunner {
    calls: Mutex<Vec<Invocation>>,
    responders: Mutex<HashMap<String, Responder>>,
}

impl FakeRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer every run of `program` with `output`.
    pub(crate) fn respond(&self, program: &str, output: ProcessOutput) {
        self.respond_with(program, move |_| output.clone());
    }

    /// Answer every run of `program` by calling `responder`.
    pub(crate) fn respond_with<F>(&self, program: &str, responder: F)
    where
        F: Fn(&Invocation) -> ProcessOutput + Send + 'static,
    {
        self.responders
            .lock()
            .unwrap()
            .insert(program.to_string(), Box::new(responder));
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program)
            .collect()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> crate::error::Result<ProcessOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        let responders = self.responders.lock().unwrap();
        Ok(match responders.get(&invocation.program) {
            Some(responder) => responder(invocation),
            None => ProcessOutput::ok(""),
        })
    }
}

/// An unpack tool that drops `files` into its working directory.
///
/// Entries ending in `/` become directories.
pub(crate) fn unpack_writing(
    files: &[(&str, &str)],
) -> impl Fn(&Invocation) -> ProcessOutput + Send + 'static {
    let files: Vec<(String, String)> = files
        .iter()
        .map(|(name, content)| (name.to_string(), content.to_string()))
        .collect();
    move |inv: &Invocation| {
        for (name, content) in &files {
            let path = inv.cwd.join(name);
            if name.ends_with('/') {
                std::fs::create_dir_all(&path).unwrap();
            } else {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).unwrap();
                }
                std::fs::write(&path, content).unwrap();
            }
        }
        ProcessOutput::ok("Extracting submission\n")
    }
}

/// Upload script output announcing a new issue.
pub(crate) fn issue_created(issue: u64) -> ProcessOutput {
    ProcessOutput::ok(format!(
        "Upload server: berkeley-61a.appspot.com\n\
         Issue created. URL: http://berkeley-61a.appspot.com/{}\n\
         Uploading base file for hog.py\n",
        issue
    ))
}

/// A config and context rooted in a temporary directory.
///
/// Templates exist for `hw1.py` and `hog.py`; `dice.py` has none, so the
/// placeholder text is used for it.
pub(crate) struct TestLayout {
    _temp_dir: TempDir,
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
    pub(crate) ctx: IntakeContext,
}

impl TestLayout {
    pub(crate) fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        let mut config = Config::default();
        config.git_author_name = Some(TEST_NAME.to_string());
        config.git_author_email = Some(TEST_EMAIL.to_string());
        config
            .important_files
            .insert("hw1".to_string(), vec!["hw1.py".to_string()]);
        config.important_files.insert(
            "proj1".to_string(),
            vec!["hog.py".to_string(), "dice.py".to_string()],
        );
        config.section_reviewers.insert(
            "11".to_string(),
            vec!["reader11@berkeley.edu".to_string()],
        );
        config.section_reviewers.insert(
            "12".to_string(),
            vec![
                "reader12@berkeley.edu".to_string(),
                "reader11@berkeley.edu".to_string(),
            ],
        );
        config.resolve_relative_to(&root);

        let ctx = IntakeContext::from_config_in(&config, &root);

        let hw_templates = ctx.template_dir.join("hw");
        let proj_templates = ctx.template_dir.join("projects");
        std::fs::create_dir_all(&hw_templates).unwrap();
        std::fs::create_dir_all(&proj_templates).unwrap();
        std::fs::write(hw_templates.join("hw1.py"), "# hw1 starter\n").unwrap();
        std::fs::write(proj_templates.join("hog.py"), "# hog starter\n").unwrap();

        Self {
            _temp_dir: temp_dir,
            root,
            config,
            ctx,
        }
    }

    pub(crate) fn git(&self) -> GitCli {
        test_git()
    }
}
