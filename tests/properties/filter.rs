//! Property tests for the severity floor.

use proptest::prelude::*;

use tailaudit::application::at_or_above;
use tailaudit::ReportFilter;

use super::summary::{build_report, findings, severity};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The floor keeps exactly the findings at or above it, in order.
    #[test]
    fn property_floor_is_an_ordered_subsequence(findings in findings(), floor in severity()) {
        let report = build_report(&findings);
        let filtered = ReportFilter::new().with_min_severity(Some(floor)).apply(&report);

        let kept: Vec<(String, bool)> = filtered
            .suggestions()
            .iter()
            .map(|s| (s.id().to_string(), s.is_pass()))
            .collect();
        let expected: Vec<(String, bool)> = at_or_above(report.suggestions(), floor)
            .into_iter()
            .map(|s| (s.id().to_string(), s.is_pass()))
            .collect();
        prop_assert_eq!(kept, expected);
        prop_assert!(filtered.suggestions().iter().all(|s| s.severity().meets(floor)));
        prop_assert_eq!(filtered.summary().total, filtered.suggestions().len());
        prop_assert_eq!(filtered.tailnet(), report.tailnet());
    }

    /// PROPERTY: Without a floor the report is unchanged.
    #[test]
    fn property_no_floor_is_identity(findings in findings()) {
        let report = build_report(&findings);
        let filtered = ReportFilter::new().apply(&report);
        prop_assert_eq!(filtered.suggestions(), report.suggestions());
        prop_assert_eq!(filtered.summary(), report.summary());
    }

    /// PROPERTY: --fail-on agrees with a scan of failing findings.
    #[test]
    fn property_fail_on_matches_failing_scan(findings in findings(), floor in severity()) {
        let report = build_report(&findings);
        let expected = findings.iter().any(|(_, s, pass)| !pass && s.meets(floor));
        prop_assert_eq!(report.has_failure_at_or_above(floor), expected);
    }
}
