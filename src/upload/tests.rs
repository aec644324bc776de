//! Tests for the upload workflow.

use super::*;
use crate::intake::Intake;
use crate::process::ProcessOutput;
use crate::registry::FileRegistry;
use crate::test_support::{
    FakeRunner, TestLayout, create_test_repo, git, issue_created, read_events, test_git,
    unpack_writing,
};
use tempfile::TempDir;

const PYTHON: &str = "python2.7";

struct Harness {
    layout: TestLayout,
    runner: FakeRunner,
    registry: FileRegistry,
    repo: TempDir,
    participants: ParticipantSet,
}

impl Harness {
    fn new(gmails: &str, sections: &str) -> Self {
        let layout = TestLayout::new();
        let registry = FileRegistry::new(&layout.ctx);
        let repo = create_test_repo();
        std::fs::write(repo.path().join("MY.GMAILS"), gmails).unwrap();
        std::fs::write(repo.path().join("MY.SECTIONS"), sections).unwrap();
        Self {
            layout,
            runner: FakeRunner::new(),
            registry,
            repo,
            participants: ParticipantSet::new(["cs61a-zz", "cs61a-ab"]).unwrap(),
        }
    }

    fn upload(&self) -> Result<UploadReport> {
        let git = test_git();
        Uploader::new(
            &self.layout.ctx,
            &self.layout.config,
            &self.runner,
            &git,
            &self.registry,
        )
        .upload(self.repo.path(), &self.participants, "proj1")
    }

    fn key(&self) -> IssueKey {
        IssueKey::new(&self.participants, "proj1")
    }
}

#[test]
fn test_empty_gmails_fails_before_any_process_runs() {
    let h = Harness::new("\n", "11\n");

    let err = h.upload().unwrap_err();

    assert!(matches!(err, IntakeError::Upload(ref msg) if msg == NO_GMAILS));
    assert!(h.runner.calls().is_empty());
    assert!(read_events(&h.layout.ctx).is_empty());
}

#[test]
fn test_missing_gmails_file_fails_the_same_way() {
    let h = Harness::new("", "");
    std::fs::remove_file(h.repo.path().join("MY.GMAILS")).unwrap();

    assert!(matches!(h.upload(), Err(IntakeError::Upload(_))));
    assert!(h.runner.calls().is_empty());
}

#[test]
fn test_first_upload_opens_issue_and_records_it() {
    let h = Harness::new("ab@gmail.com zz@gmail.com\n", "011\n");
    h.runner.respond(PYTHON, issue_created(4242));

    let report = h.upload().unwrap();

    assert_eq!(report.outcome, UploadOutcome::Created { issue: 4242 });
    assert_eq!(report.issue, Some(4242));
    assert_eq!(report.revision, git(h.repo.path(), &["rev-parse", "HEAD"]));

    let calls = h.runner.calls_to(PYTHON);
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.cwd, h.repo.path());
    assert_eq!(call.arg_after("-t"), Some("proj1"));
    assert_eq!(
        call.arg_after("-r"),
        Some("ab@gmail.com,zz@gmail.com,reader11@berkeley.edu")
    );
    assert_eq!(call.arg_after("--rev"), Some(report.revision.as_str()));
    assert!(!call.has_arg("-i"));

    let records = h.registry.list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, h.key());
    assert_eq!(records[0].issue, 4242);
}

#[test]
fn test_second_upload_updates_recorded_issue() {
    let h = Harness::new("ab@gmail.com\n", "11\n");
    h.runner.respond(PYTHON, issue_created(77));
    h.upload().unwrap();

    h.runner
        .respond(PYTHON, ProcessOutput::ok("Upload server: berkeley-61a.appspot.com\n"));
    let report = h.upload().unwrap();

    assert_eq!(report.outcome, UploadOutcome::Updated);
    assert_eq!(report.issue, Some(77));

    let calls = h.runner.calls_to(PYTHON);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].arg_after("-i"), Some("77"));
    assert!(!calls[1].has_arg("-r"));
    assert_ne!(calls[1].arg_after("-t"), Some("proj1"));
    assert_eq!(h.registry.list().unwrap().len(), 1);
}

#[test]
fn test_reviewers_are_unioned_without_duplicates() {
    let h = Harness::new("ab@gmail.com reader12@berkeley.edu\n", "011 12 99\n");

    let git = test_git();
    let uploader = Uploader::new(
        &h.layout.ctx,
        &h.layout.config,
        &h.runner,
        &git,
        &h.registry,
    );
    let recipients = uploader.recipients(h.repo.path()).unwrap();

    assert_eq!(
        recipients,
        vec![
            "ab@gmail.com",
            "reader12@berkeley.edu",
            "reader11@berkeley.edu"
        ]
    );
}

#[test]
fn test_unhandled_exception_leaves_registry_untouched() {
    let h = Harness::new("ab@gmail.com\n", "");
    h.runner.respond(
        PYTHON,
        ProcessOutput::ok("").with_stderr("Unhandled exception: 500 Server Error\n"),
    );

    let err = h.upload().unwrap_err();

    assert!(err.is_reported());
    assert!(err.to_string().contains("500 Server Error"));
    assert!(h.registry.list().unwrap().is_empty());
    assert!(read_events(&h.layout.ctx).is_empty());
}

#[test]
fn test_upload_events() {
    let h = Harness::new("ab@gmail.com\n", "");
    h.runner.respond(PYTHON, issue_created(9));

    h.upload().unwrap();

    let events = read_events(&h.layout.ctx);
    let actions: Vec<EventAction> = events.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![EventAction::IssueSet, EventAction::Upload]);
    assert_eq!(events[1].subject.as_deref(), Some("cs61a-abcs61a-zz/proj1"));
    assert_eq!(events[1].details["issue"], 9);
    assert_eq!(events[1].details["created"], true);
}

#[test]
fn test_intake_then_upload_round_trip() {
    let layout = TestLayout::new();
    let runner = FakeRunner::new();
    let git = test_git();
    let registry = FileRegistry::new(&layout.ctx);
    let intake = Intake::new(&layout.ctx, &layout.config, &runner, &git, &registry);
    let uploader = Uploader::new(&layout.ctx, &layout.config, &runner, &git, &registry);

    runner.respond_with(
        "get-subm",
        unpack_writing(&[
            ("hw1.py", "x = 1\n"),
            ("MY.GMAILS", "ab@gmail.com\n"),
            ("MY.PARTNERS", "cs61a-ab\n"),
        ]),
    );
    runner.respond(PYTHON, issue_created(12));

    let first = intake.put_in_repo("cs61a-ab", "hw1").unwrap();
    uploader
        .upload(&first.repo_path, &first.participants, "hw1")
        .unwrap();

    runner.respond_with(
        "get-subm",
        unpack_writing(&[("hw1.py", "x = 2\n"), ("MY.GMAILS", "ab@gmail.com\n")]),
    );
    runner.respond(PYTHON, ProcessOutput::ok(""));

    let second = intake.put_in_repo("cs61a-ab", "hw1").unwrap();
    assert!(!second.bootstrapped);
    uploader
        .upload(&second.repo_path, &second.participants, "hw1")
        .unwrap();

    let uploads = runner.calls_to(PYTHON);
    assert_eq!(uploads.len(), 2);
    assert!(uploads[0].has_arg("-r"));
    assert_eq!(uploads[1].arg_after("-i"), Some("12"));
    assert_ne!(uploads[0].arg_after("--rev"), uploads[1].arg_after("--rev"));
}

#[test]
fn test_resubmission_without_gmails_is_not_uploaded() {
    let layout = TestLayout::new();
    let runner = FakeRunner::new();
    let git = test_git();
    let registry = FileRegistry::new(&layout.ctx);
    let intake = Intake::new(&layout.ctx, &layout.config, &runner, &git, &registry);
    let uploader = Uploader::new(&layout.ctx, &layout.config, &runner, &git, &registry);

    runner.respond_with(
        "get-subm",
        unpack_writing(&[("hw1.py", "x = 1\n"), ("MY.GMAILS", "ab@gmail.com\n")]),
    );
    runner.respond(PYTHON, issue_created(12));
    let first = intake.put_in_repo("cs61a-ab", "hw1").unwrap();
    uploader
        .upload(&first.repo_path, &first.participants, "hw1")
        .unwrap();

    runner.respond_with("get-subm", unpack_writing(&[("hw1.py", "x = 2\n")]));
    let second = intake.put_in_repo("cs61a-ab", "hw1").unwrap();
    assert!(!second.repo_path.join("MY.GMAILS").exists());

    let err = uploader
        .upload(&second.repo_path, &second.participants, "hw1")
        .unwrap_err();

    match err {
        IntakeError::Upload(msg) => assert_eq!(msg, NO_GMAILS),
        other => panic!("expected Upload, got {:?}", other),
    }
    assert_eq!(runner.calls_to(PYTHON).len(), 1);
}
