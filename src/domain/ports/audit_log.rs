//! Audit Log Port
//!
//! Persisted trail of every mutating fix attempt, including dry runs.

use std::io;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixOutcome {
    Success,
    Failure,
    DryRun,
}

/// One line of the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<Utc>,
    pub tailnet: String,
    pub check_id: String,
    pub action: String,
    pub target: String,
    pub outcome: FixOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub trait AuditLog: Send + Sync {
    fn append(&self, entry: &AuditLogEntry) -> io::Result<()>;
}

/// Discards entries. Used when the audit log is disabled.
pub struct NullAuditLog;

impl AuditLog for NullAuditLog {
    fn append(&self, _entry: &AuditLogEntry) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn entry_serializes_outcome_tokens() {
        let entry = AuditLogEntry {
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            tailnet: "example.com".into(),
            check_id: "DEV-004".into(),
            action: "delete-device".into(),
            target: "n123".into(),
            outcome: FixOutcome::DryRun,
            error: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp":"2026-03-01T12:00:00Z","tailnet":"example.com","check_id":"DEV-004","action":"delete-device","target":"n123","outcome":"dry-run"}"#
        );
    }
}
