//! Report filtering
//!
//! The caller-facing narrowing surface: a minimum severity, a set of
//! categories and an explicit list of check IDs or slugs. Categories and
//! checks decide what runs; the severity floor is applied to the finished
//! report.

use crate::audit::CheckSelection;
use crate::domain::entities::{AuditReport, CheckRegistry, Suggestion};
use crate::domain::value_objects::{Category, Severity};
use crate::error::{AuditError, AuditResult};

use super::audit::AuditOptions;

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub min_severity: Option<Severity>,
    pub categories: Vec<Category>,
    /// Check IDs or slugs, as typed by the user.
    pub checks: Vec<String>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_severity(mut self, floor: Option<Severity>) -> Self {
        self.min_severity = floor;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_checks(mut self, checks: Vec<String>) -> Self {
        self.checks = checks;
        self
    }

    /// Resolve `checks` against the registry.
    ///
    /// Fails with every unknown name at once, before anything runs.
    pub fn selection(&self, registry: &CheckRegistry) -> AuditResult<CheckSelection> {
        if self.checks.iter().all(|c| c.trim().is_empty()) {
            return Ok(CheckSelection::All);
        }
        let ids = registry.resolve_all(&self.checks)?;
        Ok(CheckSelection::only(ids))
    }

    /// Apply the run-shaping parts of the filter to `options`.
    pub fn apply_to(&self, options: AuditOptions, registry: &CheckRegistry) -> AuditResult<AuditOptions> {
        Ok(options
            .with_selection(self.selection(registry)?)
            .with_categories(self.categories.clone()))
    }

    /// The report with findings below the severity floor removed.
    pub fn apply(&self, report: &AuditReport) -> AuditReport {
        match self.min_severity {
            Some(floor) => report.retain(|s| s.severity().meets(floor)),
            None => report.clone(),
        }
    }
}

/// Keep suggestions at or above `floor`, in their original order.
pub fn at_or_above(suggestions: &[Suggestion], floor: Severity) -> Vec<&Suggestion> {
    suggestions
        .iter()
        .filter(|s| s.severity().meets(floor))
        .collect()
}

/// Parse `--category` values, comma separated or repeated.
pub fn parse_categories<S: AsRef<str>>(names: &[S]) -> AuditResult<Vec<Category>> {
    let mut out = Vec::new();
    for name in names.iter().flat_map(|n| n.as_ref().split(',')) {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let category = Category::parse(name).ok_or_else(|| AuditError::UnknownCategory {
            name: name.to_string(),
            expected: Category::ALL
                .iter()
                .map(|c| c.short_name())
                .collect::<Vec<_>>()
                .join(", "),
        })?;
        if !out.contains(&category) {
            out.push(category);
        }
    }
    Ok(out)
}
