use tailaudit::domain::value_objects::AuthorityScope;
use tailaudit::{AuditReport, Category, Severity};

use crate::ui::blocks::finding::FindingItem;
use crate::ui::blocks::header::CommandHeader;
use crate::ui::blocks::summary::AuditSummary;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_audit_header(
    report: &AuditReport,
    floor: Option<Severity>,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Audit, "Tailnet Security Audit")
        .field("Tailnet", report.tailnet())
        .field("Time", report.timestamp().format("%Y-%m-%d %H:%M:%S UTC").to_string());
    if let Some(floor) = floor {
        header = header.field("Showing", format!("{} and above", floor.as_str()));
    }
    header.render(supports_color, supports_unicode)
}

/// Findings grouped by category in run order, or ranked by severity.
pub fn render_findings(
    report: &AuditReport,
    sort_severity: bool,
    verbose: u8,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = String::new();
    let verbose = verbose > 0;

    if sort_severity {
        out.push('\n');
        for s in report.by_severity() {
            out.push_str(&FindingItem::new(s).render(verbose, supports_color, supports_unicode));
        }
        return out;
    }

    let mut current: Option<Category> = None;
    for s in report.suggestions() {
        if current != Some(s.category()) {
            out.push('\n');
            out.push_str(
                &ColoredText::plain(s.category().display_name())
                    .bold()
                    .render(supports_color),
            );
            out.push('\n');
            current = Some(s.category());
        }
        out.push_str(&FindingItem::new(s).render(verbose, supports_color, supports_unicode));
    }
    out
}

pub fn render_audit_summary(
    report: &AuditReport,
    fixable: usize,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut block = AuditSummary::new(*report.summary());
    if let Some(scoped) = report
        .suggestions()
        .iter()
        .find(|s| s.scope() == Some(AuthorityScope::LocalNode))
    {
        block.add_note(format!(
            "{} describes the local node, not necessarily this tailnet",
            scoped.id()
        ));
    }
    if fixable > 0 {
        block.with_next_step(format!(
            "{fixable} finding(s) have API fixes; run with --fix or --dry-run"
        ));
    }
    block.render(supports_color, supports_unicode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tailaudit::domain::entities::ReportBuilder;
    use tailaudit::{CheckRegistry, Suggestion};

    fn report() -> AuditReport {
        let registry = CheckRegistry::global().unwrap();
        let mut builder = ReportBuilder::new("example.com", Utc::now());
        for (id, severity, pass) in [
            ("ACL-003", Severity::Low, false),
            ("ACL-001", Severity::Critical, true),
            ("AUTH-001", Severity::High, false),
            ("DNS-001", Severity::Medium, false),
        ] {
            let s = Suggestion::new(registry.get(id).unwrap(), severity, "d", "r");
            builder.push(if pass { s.passed() } else { s });
        }
        builder.finish()
    }

    #[test]
    fn findings_are_grouped_under_category_headings() {
        let rendered = render_findings(&report(), false, 0, false, false);
        let acl = rendered.find("Access Controls").unwrap();
        let auth = rendered.find("Authentication & Keys").unwrap();
        let dns = rendered.find("DNS Configuration").unwrap();
        assert!(acl < auth && auth < dns);
        assert_eq!(rendered.matches("Access Controls").count(), 1);
    }

    #[test]
    fn severity_sort_ranks_without_headings() {
        let rendered = render_findings(&report(), true, 0, false, false);
        let pos = |id: &str| rendered.find(id).unwrap();
        assert!(pos("ACL-001") < pos("AUTH-001"));
        assert!(pos("AUTH-001") < pos("DNS-001"));
        assert!(pos("DNS-001") < pos("ACL-003"));
        assert!(!rendered.contains("Access Controls"));
    }

    #[test]
    fn header_shows_floor() {
        let rendered = render_audit_header(&report(), Some(Severity::High), false, false);
        assert!(rendered.contains("Tailnet: example.com"));
        assert!(rendered.contains("Showing: HIGH and above"));
    }
}
