//! Category auditors
//!
//! Each category is a table of [`CheckDef`]s: a check ID, its default
//! severity, and a pure function from the category's fetched input to an
//! [`Outcome`]. Checks never see each other's results, so any subset can
//! be run without changing the rest.

pub mod acl;
pub mod auth;
pub mod device;
pub mod dns;
pub mod logging;
pub mod network;
pub mod ssh;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::config::Thresholds;
use crate::domain::entities::{CheckRegistry, FixDescriptor, RegistryError, Suggestion};
use crate::domain::value_objects::{AuthorityScope, Category, Severity};
use crate::error::AuditResult;

pub use acl::AclAuditor;
pub use auth::AuthAuditor;
pub use device::{DeviceAuditor, DeviceInput};
pub use dns::DnsAuditor;
pub use logging::{LoggingAuditor, LoggingInput};
pub use network::{NetworkAuditor, NetworkInput};
pub use ssh::SshAuditor;

pub(crate) const ADMIN_URL: &str = "https://login.tailscale.com/admin";
pub(crate) const DOCS_URL: &str = "https://tailscale.com/kb";

/// Values every check may read besides its input.
#[derive(Debug, Clone)]
pub struct CheckContext {
    pub now: DateTime<Utc>,
    pub thresholds: Thresholds,
    pub tailnet: String,
}

impl CheckContext {
    pub fn new(tailnet: impl Into<String>, thresholds: Thresholds) -> Self {
        Self {
            now: Utc::now(),
            thresholds,
            tailnet: tailnet.into(),
        }
    }
}

/// What one check found.
#[derive(Debug, Clone)]
pub struct Evidence {
    description: String,
    remediation: String,
    details: Vec<String>,
    fix: Option<FixDescriptor>,
    severity: Option<Severity>,
    scope: Option<AuthorityScope>,
}

impl Evidence {
    pub fn new(description: impl Into<String>, remediation: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            remediation: remediation.into(),
            details: Vec::new(),
            fix: None,
            severity: None,
            scope: None,
        }
    }

    /// One entry per offending resource.
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn with_fix(mut self, fix: FixDescriptor) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Replace the check's default severity with one derived from the data.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_scope(mut self, scope: AuthorityScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// Result of evaluating one check.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A prerequisite was false; the check contributes nothing.
    Omitted,
    Pass(Evidence),
    Fail(Evidence),
}

/// One check in a category table.
pub struct CheckDef<I: ?Sized> {
    pub id: &'static str,
    pub severity: Severity,
    pub run: fn(&I, &CheckContext) -> Outcome,
}

impl<I: ?Sized> CheckDef<I> {
    /// Evaluate against `input`, producing at most one suggestion.
    pub fn evaluate(
        &self,
        registry: &CheckRegistry,
        input: &I,
        ctx: &CheckContext,
    ) -> AuditResult<Option<Suggestion>> {
        let info = registry
            .get(self.id)
            .ok_or_else(|| RegistryError::Unregistered(self.id.to_string()))?;

        let (evidence, pass) = match (self.run)(input, ctx) {
            Outcome::Omitted => return Ok(None),
            Outcome::Pass(e) => (e, true),
            Outcome::Fail(e) => (e, false),
        };

        let severity = evidence.severity.unwrap_or(self.severity);
        let mut suggestion = Suggestion::new(info, severity, evidence.description, evidence.remediation)
            .with_details(evidence.details);
        if let Some(scope) = evidence.scope {
            suggestion = suggestion.with_scope(scope);
        }
        if pass {
            suggestion = suggestion.passed();
        } else if let Some(fix) = evidence.fix {
            suggestion = suggestion.with_fix(fix);
        }
        Ok(Some(suggestion))
    }
}

/// Which checks a run evaluates. `All` unless `--checks` was given.
#[derive(Debug, Clone, Default)]
pub enum CheckSelection {
    #[default]
    All,
    Only(HashSet<&'static str>),
}

impl CheckSelection {
    pub fn only<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        CheckSelection::Only(ids.into_iter().collect())
    }

    pub fn includes(&self, id: &str) -> bool {
        match self {
            CheckSelection::All => true,
            CheckSelection::Only(ids) => ids.contains(id),
        }
    }

    /// True if at least one check in `defs` is selected.
    pub fn any_of<I: ?Sized>(&self, defs: &[CheckDef<I>]) -> bool {
        defs.iter().any(|d| self.includes(d.id))
    }
}

/// Common contract of the seven category auditors.
pub trait CategoryAuditor {
    /// Already-fetched data the checks read.
    type Input: 'static;

    fn category(&self) -> Category;

    fn checks(&self) -> &'static [CheckDef<Self::Input>];

    /// Run every selected check in table order.
    fn audit(
        &self,
        registry: &CheckRegistry,
        input: &Self::Input,
        ctx: &CheckContext,
        selection: &CheckSelection,
    ) -> AuditResult<Vec<Suggestion>> {
        let mut out = Vec::new();
        for def in self.checks().iter().filter(|d| selection.includes(d.id)) {
            if let Some(s) = def.evaluate(registry, input, ctx)? {
                out.push(s);
            }
        }
        tracing::debug!(
            category = %self.category(),
            findings = out.len(),
            "category audited"
        );
        Ok(out)
    }
}

/// Pass/fail helper for "list offenders" checks.
pub(crate) fn offenders(
    details: Vec<String>,
    pass: impl FnOnce() -> Evidence,
    fail: impl FnOnce(&[String]) -> Evidence,
) -> Outcome {
    if details.is_empty() {
        Outcome::Pass(pass())
    } else {
        let evidence = fail(&details).with_details(details);
        Outcome::Fail(evidence)
    }
}

pub(crate) fn admin_url(path: &str) -> String {
    format!("{ADMIN_URL}/{path}")
}

pub(crate) fn doc_url(path: &str) -> String {
    format!("{DOCS_URL}/{path}")
}
