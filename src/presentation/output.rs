//! Report Output
//!
//! The JSON report document. Key order is fixed by the entity definitions:
//! `timestamp`, `tailnet`, `suggestions`, `summary`, and within each
//! suggestion `id` through `scope`.

use std::fs;
use std::path::Path;

use crate::domain::entities::AuditReport;
use crate::error::AuditResult;

/// Render the report as pretty-printed JSON.
pub fn report_json(report: &AuditReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Write the JSON report to `path`, creating parent directories.
pub fn write_report(report: &AuditReport, path: &Path) -> AuditResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut json = report_json(report).map_err(std::io::Error::other)?;
    json.push('\n');
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "wrote report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CheckRegistry, FixDescriptor, ReportBuilder, Suggestion};
    use crate::domain::value_objects::{AuthorityScope, Severity};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn sample_report() -> AuditReport {
        let registry = CheckRegistry::global().unwrap();
        let timestamp = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let mut builder = ReportBuilder::new("example.com", timestamp);
        builder.push(
            Suggestion::new(
                registry.get("ACL-003").unwrap(),
                Severity::Low,
                "The policy has no tests section.",
                "Add tests that assert expected access.",
            )
            .with_fix(
                FixDescriptor::manual("Add a tests section to the policy file")
                    .with_admin_url("https://login.tailscale.com/admin/acls/file"),
            ),
        );
        builder.push(
            Suggestion::new(
                registry.get("DEV-010").unwrap(),
                Severity::Info,
                "Tailnet Lock is enabled.",
                "No action needed.",
            )
            .with_details(vec!["node key signed".to_string()])
            .with_scope(AuthorityScope::LocalNode)
            .passed(),
        );
        builder.finish()
    }

    #[test]
    fn report_json_matches_document_shape() {
        let json = report_json(&sample_report()).unwrap();
        insta::assert_snapshot!(json, @r#"
        {
          "timestamp": "2026-01-02T03:04:05Z",
          "tailnet": "example.com",
          "suggestions": [
            {
              "id": "ACL-003",
              "title": "No ACL tests defined",
              "severity": "LOW",
              "category": "Access Controls",
              "description": "The policy has no tests section.",
              "remediation": "Add tests that assert expected access.",
              "pass": false,
              "fix": {
                "type": "manual",
                "description": "Add a tests section to the policy file",
                "admin_url": "https://login.tailscale.com/admin/acls/file"
              }
            },
            {
              "id": "DEV-010",
              "title": "Tailnet Lock not enabled",
              "severity": "INFO",
              "category": "Device Security",
              "description": "Tailnet Lock is enabled.",
              "remediation": "No action needed.",
              "details": [
                "node key signed"
              ],
              "pass": true,
              "scope": "local-node"
            }
          ],
          "summary": {
            "critical": 0,
            "high": 0,
            "medium": 0,
            "low": 1,
            "info": 0,
            "passed": 1,
            "total": 2
          }
        }
        "#);
    }

    #[test]
    fn write_report_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports/audit.json");
        let report = sample_report();

        write_report(&report, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["tailnet"], "example.com");
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["suggestions"][0]["fix"]["type"], "manual");
    }
}
