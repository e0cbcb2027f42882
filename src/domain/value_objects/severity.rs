//! Severity value object - ordinal risk rank of a failing finding

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a finding.
///
/// Declaration order is weakest first so the derived `Ord` gives
/// `Critical > High > Medium > Low > Info`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[serde(alias = "info")]
    Info,
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "critical")]
    Critical,
}

impl Severity {
    /// Strongest first, the order used for severity-first sorting and summaries.
    pub const DESCENDING: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// Upper-case token used in the serialized report.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// True when `self` is at least as severe as `floor`.
    pub fn meets(&self, floor: Severity) -> bool {
        *self >= floor
    }

    /// Case-insensitive parse used by config and env overrides.
    pub fn parse(value: &str) -> Option<Severity> {
        match value.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Severity::Info),
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_is_strongest() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Info);
    }

    #[test]
    fn meets_is_inclusive() {
        assert!(Severity::High.meets(Severity::High));
        assert!(Severity::Critical.meets(Severity::High));
        assert!(!Severity::Medium.meets(Severity::High));
    }

    #[test]
    fn serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            r#""CRITICAL""#
        );
        let parsed: Severity = serde_json::from_str(r#""medium""#).unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!(Severity::parse("HiGh"), Some(Severity::High));
        assert_eq!(Severity::parse("severe"), None);
    }
}
