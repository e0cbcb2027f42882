//! Audit report entity
//!
//! Suggestions are held in category-run order. The summary is derived from
//! them when the report is finished and whenever a filtered view is taken;
//! it is never edited directly.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::suggestion::Suggestion;
use crate::domain::value_objects::Severity;

/// Counts of failing findings per severity, plus passed and total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
    pub passed: usize,
    pub total: usize,
}

impl Summary {
    pub fn from_suggestions(suggestions: &[Suggestion]) -> Self {
        let mut summary = Summary::default();
        for s in suggestions {
            summary.total += 1;
            if s.is_pass() {
                summary.passed += 1;
                continue;
            }
            match s.severity() {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }

    pub fn failing(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }
}

/// Accumulates suggestions during a run. Owned by the orchestrator.
#[derive(Debug)]
pub struct ReportBuilder {
    timestamp: DateTime<Utc>,
    tailnet: String,
    suggestions: Vec<Suggestion>,
}

impl ReportBuilder {
    pub fn new(tailnet: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            tailnet: tailnet.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn push(&mut self, suggestion: Suggestion) {
        self.suggestions.push(suggestion);
    }

    pub fn extend(&mut self, suggestions: impl IntoIterator<Item = Suggestion>) {
        self.suggestions.extend(suggestions);
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Compute the summary and freeze the report.
    pub fn finish(self) -> AuditReport {
        let summary = Summary::from_suggestions(&self.suggestions);
        AuditReport {
            timestamp: self.timestamp,
            tailnet: self.tailnet,
            suggestions: self.suggestions,
            summary,
        }
    }
}

/// A finished audit. Immutable; filtering produces a new report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    timestamp: DateTime<Utc>,
    tailnet: String,
    suggestions: Vec<Suggestion>,
    summary: Summary,
}

impl AuditReport {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn tailnet(&self) -> &str {
        &self.tailnet
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn failing(&self) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter().filter(|s| !s.is_pass())
    }

    /// A new report holding only the suggestions `keep` accepts, in the
    /// same order, with a recomputed summary.
    pub fn retain<F>(&self, keep: F) -> AuditReport
    where
        F: Fn(&Suggestion) -> bool,
    {
        let suggestions: Vec<Suggestion> =
            self.suggestions.iter().filter(|s| keep(s)).cloned().collect();
        let summary = Summary::from_suggestions(&suggestions);
        AuditReport {
            timestamp: self.timestamp,
            tailnet: self.tailnet.clone(),
            suggestions,
            summary,
        }
    }

    /// Suggestions ordered strongest severity first. Stable, so category
    /// order is kept within a severity. For rendering only.
    pub fn by_severity(&self) -> Vec<&Suggestion> {
        let mut sorted: Vec<&Suggestion> = self.suggestions.iter().collect();
        sorted.sort_by(|a, b| b.severity().cmp(&a.severity()));
        sorted
    }

    /// True if any failing finding is at or above `floor`.
    pub fn has_failure_at_or_above(&self, floor: Severity) -> bool {
        self.failing().any(|s| s.severity().meets(floor))
    }
}
