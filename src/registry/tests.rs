//! Tests for the issue registry.

use super::*;
use crate::config::Config;
use crate::context::IntakeContext;
use crate::error::IntakeError;
use crate::locks::acquire_registry_lock;
use tempfile::TempDir;

fn create_registry() -> (TempDir, IntakeContext, FileRegistry) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = IntakeContext::from_config_in(&Config::default(), temp_dir.path());
    let registry = FileRegistry::new(&ctx);
    (temp_dir, ctx, registry)
}

fn key(logins: &[&str], assignment: &str) -> IssueKey {
    IssueKey::new(&ParticipantSet::new(logins.iter().copied()).unwrap(), assignment)
}

#[test]
fn test_get_on_empty_registry_is_none() {
    let (_temp_dir, ctx, registry) = create_registry();
    assert_eq!(registry.get(&key(&["cs61a-ab"], "hw1")).unwrap(), None);
    assert!(!ctx.registry_path().exists());
}

#[test]
fn test_set_then_get() {
    let (_temp_dir, _ctx, registry) = create_registry();
    let k = key(&["cs61a-ab"], "hw1");

    registry.set(&k, 42).unwrap();
    assert_eq!(registry.get(&k).unwrap(), Some(42));
    assert_eq!(registry.get(&key(&["cs61a-ab"], "hw2")).unwrap(), None);
}

#[test]
fn test_key_is_order_insensitive() {
    let (_temp_dir, _ctx, registry) = create_registry();

    registry
        .set(&key(&["cs61a-zz", "cs61a-ab"], "proj1"), 7)
        .unwrap();

    assert_eq!(
        registry.get(&key(&["cs61a-ab", "cs61a-zz"], "proj1")).unwrap(),
        Some(7)
    );
}

#[test]
fn test_set_replaces_existing_entry() {
    let (_temp_dir, _ctx, registry) = create_registry();
    let k = key(&["cs61a-ab"], "hw1");

    registry.set(&k, 1).unwrap();
    registry.set(&k, 2).unwrap();

    assert_eq!(registry.get(&k).unwrap(), Some(2));
    assert_eq!(registry.list().unwrap().len(), 1);
}

#[test]
fn test_set_rejects_zero() {
    let (_temp_dir, _ctx, registry) = create_registry();
    let result = registry.set(&key(&["cs61a-ab"], "hw1"), 0);
    assert!(matches!(result, Err(IntakeError::UserError(_))));
}

#[test]
fn test_remove_requires_matching_issue() {
    let (_temp_dir, _ctx, registry) = create_registry();
    let k = key(&["cs61a-ab"], "hw1");
    registry.set(&k, 42).unwrap();

    assert!(!registry.remove(&k, 41).unwrap());
    assert_eq!(registry.get(&k).unwrap(), Some(42));

    assert!(registry.remove(&k, 42).unwrap());
    assert_eq!(registry.get(&k).unwrap(), None);
}

#[test]
fn test_entries_persist_across_instances() {
    let (_temp_dir, ctx, registry) = create_registry();
    registry.set(&key(&["cs61a-ab"], "hw1"), 3).unwrap();
    registry.set(&key(&["cs61a-aa"], "hw1"), 4).unwrap();

    let reopened = FileRegistry::new(&ctx);
    let records = reopened.list().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].key.participants, vec!["cs61a-aa"]);
    assert_eq!(records[1].issue, 3);
}

#[test]
fn test_document_format() {
    let (_temp_dir, ctx, registry) = create_registry();
    registry
        .set(&key(&["cs61a-cd", "cs61a-ab"], "proj1"), 99)
        .unwrap();

    let content = std::fs::read_to_string(ctx.registry_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "issues": [
                {"participants": ["cs61a-ab", "cs61a-cd"], "assignment": "proj1", "issue": 99}
            ]
        })
    );
}

#[test]
fn test_write_fails_while_registry_locked() {
    let (_temp_dir, ctx, registry) = create_registry();
    let _guard = acquire_registry_lock(&ctx, "test").unwrap();

    let result = registry.set(&key(&["cs61a-ab"], "hw1"), 5);
    assert!(matches!(result, Err(IntakeError::LockError(_))));
}

#[test]
fn test_corrupt_registry_is_user_error() {
    let (_temp_dir, ctx, registry) = create_registry();
    std::fs::create_dir_all(&ctx.state_dir).unwrap();
    std::fs::write(ctx.registry_path(), "{not json").unwrap();

    let result = registry.get(&key(&["cs61a-ab"], "hw1"));
    assert!(matches!(result, Err(IntakeError::UserError(_))));
}

#[test]
fn test_key_display_matches_repository_layout() {
    assert_eq!(
        key(&["cs61a-cd", "cs61a-ab"], "proj1").to_string(),
        "cs61a-abcs61a-cd/proj1"
    );
}
