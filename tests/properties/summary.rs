//! Property tests for report assembly and the summary.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use tailaudit::domain::entities::ReportBuilder;
use tailaudit::{AuditReport, CheckRegistry, Severity, Suggestion};

pub fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Info),
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

/// (catalog index, severity, passed)
pub fn findings() -> impl Strategy<Value = Vec<(usize, Severity, bool)>> {
    proptest::collection::vec((0usize..1000, severity(), any::<bool>()), 0..=40)
}

pub fn build_report(findings: &[(usize, Severity, bool)]) -> AuditReport {
    let registry = CheckRegistry::global().unwrap();
    let all = registry.all();
    let mut builder = ReportBuilder::new("example.com", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    for (idx, severity, pass) in findings {
        let info = &all[idx % all.len()];
        let suggestion = Suggestion::new(info, *severity, "generated", "none");
        builder.push(if *pass { suggestion.passed() } else { suggestion });
    }
    builder.finish()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Passed plus per-severity failing counts equal the total.
    #[test]
    fn property_summary_counts_add_up(findings in findings()) {
        let report = build_report(&findings);
        let summary = report.summary();

        prop_assert_eq!(summary.total, findings.len());
        prop_assert_eq!(summary.passed + summary.failing(), summary.total);
        prop_assert_eq!(summary.passed, findings.iter().filter(|(_, _, pass)| *pass).count());
        for severity in Severity::DESCENDING {
            let expected = findings
                .iter()
                .filter(|(_, s, pass)| !pass && *s == severity)
                .count();
            prop_assert_eq!(summary.count(severity), expected);
        }
    }

    /// PROPERTY: One more failing CRITICAL finding moves only `critical`
    /// and `total`, each by one.
    #[test]
    fn property_failing_critical_bumps_only_critical_and_total(
        findings in findings(),
        idx in 0usize..1000,
    ) {
        let before = *build_report(&findings).summary();
        let mut extended = findings.clone();
        extended.push((idx, Severity::Critical, false));
        let after = *build_report(&extended).summary();

        prop_assert_eq!(after.critical, before.critical + 1);
        prop_assert_eq!(after.total, before.total + 1);
        prop_assert_eq!(after.high, before.high);
        prop_assert_eq!(after.medium, before.medium);
        prop_assert_eq!(after.low, before.low);
        prop_assert_eq!(after.info, before.info);
        prop_assert_eq!(after.passed, before.passed);
    }

    /// PROPERTY: Insertion order is preserved.
    #[test]
    fn property_report_keeps_insertion_order(findings in findings()) {
        let registry = CheckRegistry::global().unwrap();
        let all = registry.all();
        let report = build_report(&findings);

        let ids: Vec<&str> = report.suggestions().iter().map(|s| s.id()).collect();
        let expected: Vec<&str> = findings.iter().map(|(idx, _, _)| all[idx % all.len()].id).collect();
        prop_assert_eq!(ids, expected);
    }

    /// PROPERTY: Severity ordering is descending and stable.
    #[test]
    fn property_by_severity_is_stable(findings in findings()) {
        let report = build_report(&findings);
        let sorted = report.by_severity();

        prop_assert_eq!(sorted.len(), report.suggestions().len());
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].severity() >= pair[1].severity());
        }
        // Within one severity the original relative order survives.
        let position = |s: &Suggestion| {
            report
                .suggestions()
                .iter()
                .position(|x| std::ptr::eq(x, s))
                .unwrap()
        };
        for pair in sorted.windows(2) {
            if pair[0].severity() == pair[1].severity() {
                prop_assert!(position(pair[0]) < position(pair[1]));
            }
        }
    }
}
