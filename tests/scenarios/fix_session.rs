//! Scenario: Remediate findings
//!
//! Journey: After an audit, the operator previews fixes, dry-runs them,
//! lets auto mode clean up, and walks through the rest interactively.
//!
//! Success Criteria:
//! - Dry runs are logged but never mutate the tailnet
//! - Auto mode only deletes stale devices
//! - Interactive decisions are honored per target
//! - A re-audit reflects what was fixed

use std::fs;
use std::sync::Arc;

use tailaudit::domain::entities::FixKind;
use tailaudit::domain::ports::{
    AuditLogEntry, FixDecision, FixOutcome, FixPrompt, FixPromptContext, NoLockProbe,
};
use tailaudit::infrastructure::JsonlAuditLog;
use tailaudit::{
    AuditOptions, AuditReport, AuditUseCase, CancelToken, CheckRegistry, FixEngine, FixMode,
};
use tempfile::tempdir;

use crate::common::*;

fn stale_tailnet() -> Arc<FakeTailnet> {
    Arc::new(
        FakeTailnet::new()
            .with_devices(vec![
                server("1", "2026-05-31T12:00:00Z"),
                server("old", "2025-01-01T00:00:00Z"),
            ])
            .with_keys(vec![reusable_key("k1")]),
    )
}

fn audit(api: &Arc<FakeTailnet>) -> AuditReport {
    AuditUseCase::new(
        api.clone(),
        Arc::new(NoLockProbe),
        CheckRegistry::global().unwrap(),
    )
    .execute(&AuditOptions::new().with_now(now()), &CancelToken::new())
    .unwrap()
}

fn read_log(path: &std::path::Path) -> Vec<AuditLogEntry> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Applies stale device deletions, declines everything else.
struct DeleteStaleOnly;

impl FixPrompt for DeleteStaleOnly {
    fn decide(&self, context: &FixPromptContext) -> FixDecision {
        if context.kind == FixKind::DeleteStaleDevice {
            FixDecision::Apply
        } else {
            FixDecision::Skip
        }
    }
}

/// SCENARIO: Preview shows fixes without touching anything
#[test]
fn scenario_preview_changes_nothing() {
    let api = stale_tailnet();
    let report = audit(&api);

    let result = FixEngine::new(api.clone()).execute(&report, FixMode::PreviewOnly, &CancelToken::new());

    assert!(result.previewed >= 2);
    assert_eq!(result.applied, 0);
    assert!(api.mutations().is_empty());
}

/// SCENARIO: Dry run logs every would-be mutation and changes nothing
#[test]
fn scenario_dry_run_is_logged_not_applied() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("logs/fix-audit.jsonl");
    let api = stale_tailnet();
    let report = audit(&api);

    let result = FixEngine::new(api.clone())
        .with_audit_log(Arc::new(JsonlAuditLog::new(&log_path)))
        .execute(&report, FixMode::DryRun, &CancelToken::new());

    assert!(api.mutations().is_empty());
    assert_eq!(result.applied, 0);
    assert!(result.is_success());

    let entries = read_log(&log_path);
    assert_eq!(entries.len(), result.dry_run);
    assert!(entries.iter().all(|e| e.outcome == FixOutcome::DryRun));
    assert!(entries.iter().all(|e| e.tailnet == TAILNET));
    assert!(entries
        .iter()
        .any(|e| e.check_id == "DEV-004" && e.action == "delete-device" && e.target == "old"));
    assert!(entries
        .iter()
        .any(|e| e.check_id == "AUTH-001" && e.action == "delete-key" && e.target == "k1"));
}

/// SCENARIO: Auto mode removes the stale device and leaves the key alone
#[test]
fn scenario_auto_fix_then_reaudit() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("fix-audit.jsonl");
    let api = stale_tailnet();
    let report = audit(&api);

    let result = FixEngine::new(api.clone())
        .with_audit_log(Arc::new(JsonlAuditLog::new(&log_path)))
        .execute(&report, FixMode::Auto, &CancelToken::new());

    assert_eq!(api.mutations(), ["delete-device:old"]);
    assert_eq!(result.applied, 1);
    assert!(result.skipped >= 1);
    assert_eq!(api.device_ids(), ["1"]);
    assert_eq!(api.key_ids_left(), ["k1"]);

    let entries = read_log(&log_path);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, FixOutcome::Success);
    assert_eq!(entries[0].check_id, "DEV-004");

    let after = audit(&api);
    let stale = after.suggestions().iter().find(|s| s.id() == "DEV-004").unwrap();
    assert!(stale.is_pass());
    let reusable = after.suggestions().iter().find(|s| s.id() == "AUTH-001").unwrap();
    assert!(!reusable.is_pass());
}

/// SCENARIO: Interactive session applies only what the operator accepts
#[test]
fn scenario_interactive_decisions() {
    let api = stale_tailnet();
    let report = audit(&api);

    let result = FixEngine::new(api.clone())
        .with_prompt(Arc::new(DeleteStaleOnly))
        .execute(&report, FixMode::Interactive, &CancelToken::new());

    assert_eq!(api.mutations(), ["delete-device:old"]);
    assert_eq!(result.applied, 1);
    assert!(result.skipped >= 1);
    assert!(!result.cancelled);
}

/// SCENARIO: A cancelled session applies nothing further
#[test]
fn scenario_cancelled_session() {
    let api = stale_tailnet();
    let report = audit(&api);
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = FixEngine::new(api.clone()).execute(&report, FixMode::Auto, &cancel);

    assert!(result.cancelled);
    assert_eq!(result.applied, 0);
    assert!(api.mutations().is_empty());
}
