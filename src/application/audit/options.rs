//! Audit Options

use chrono::{DateTime, Utc};

use crate::audit::CheckSelection;
use crate::config::Thresholds;
use crate::domain::value_objects::Category;

/// Options for the audit use case
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    /// Checks to evaluate (`--checks`)
    pub selection: CheckSelection,
    /// Categories to run; empty means all (`--category`)
    pub categories: Vec<Category>,
    /// Limits the checks compare against
    pub thresholds: Thresholds,
    /// Fixed clock for deterministic runs; `None` uses the current time
    pub now: Option<DateTime<Utc>>,
}

impl AuditOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(mut self, selection: CheckSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn includes_category(&self, category: Category) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }
}
