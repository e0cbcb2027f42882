//! Suggestion entity - one check's result plus remediation guidance

use serde::Serialize;

use super::registry::CheckInfo;
use crate::domain::tailnet::KeyCapabilities;
use crate::domain::value_objects::{AuthorityScope, Category, Severity};

/// Whether a fix can be executed or is guidance only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixType {
    Manual,
    Api,
}

/// Enumerated remediation kinds.
///
/// Safety for unattended application is a fixed property of the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixKind {
    DeleteStaleDevice,
    RevokeAuthKey,
    AuthorizeDevice,
    ClearDeviceTags,
    CreateEphemeralKey,
}

impl FixKind {
    pub const ALL: [FixKind; 5] = [
        FixKind::DeleteStaleDevice,
        FixKind::RevokeAuthKey,
        FixKind::AuthorizeDevice,
        FixKind::ClearDeviceTags,
        FixKind::CreateEphemeralKey,
    ];

    /// Only removal of resources that are already unused is safe for auto mode.
    pub const fn is_safe_for_auto(self) -> bool {
        matches!(self, FixKind::DeleteStaleDevice)
    }

    /// Name recorded as `action` in the audit log.
    pub fn action_name(self) -> &'static str {
        match self {
            FixKind::DeleteStaleDevice => "delete-device",
            FixKind::RevokeAuthKey => "delete-key",
            FixKind::AuthorizeDevice => "authorize-device",
            FixKind::ClearDeviceTags => "set-device-tags",
            FixKind::CreateEphemeralKey => "create-key",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            FixKind::DeleteStaleDevice => "Delete stale device",
            FixKind::RevokeAuthKey => "Revoke auth key",
            FixKind::AuthorizeDevice => "Authorize device",
            FixKind::ClearDeviceTags => "Remove tags from device",
            FixKind::CreateEphemeralKey => "Create replacement ephemeral key",
        }
    }
}

/// A bound mutating call against the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    DeleteKey {
        key_id: String,
    },
    DeleteDevice {
        device_id: String,
    },
    AuthorizeDevice {
        device_id: String,
    },
    SetDeviceTags {
        device_id: String,
        tags: Vec<String>,
    },
    CreateKey {
        capabilities: KeyCapabilities,
        expiry_seconds: Option<u64>,
        description: String,
    },
}

/// One resource a fix acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixTarget {
    /// Identifier recorded in the audit log.
    pub id: String,
    /// Human-readable name shown in prompts.
    pub label: String,
    pub mutation: Mutation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixAction {
    pub kind: FixKind,
    pub targets: Vec<FixTarget>,
}

/// Structured remediation directive.
///
/// `action` is only ever present for [`FixType::Api`]; the constructors
/// keep that pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixDescriptor {
    #[serde(rename = "type")]
    fix_type: FixType,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_url: Option<String>,
    #[serde(skip)]
    action: Option<FixAction>,
}

impl FixDescriptor {
    pub fn manual(description: impl Into<String>) -> Self {
        Self {
            fix_type: FixType::Manual,
            description: description.into(),
            admin_url: None,
            doc_url: None,
            action: None,
        }
    }

    pub fn api(description: impl Into<String>, kind: FixKind, targets: Vec<FixTarget>) -> Self {
        Self {
            fix_type: FixType::Api,
            description: description.into(),
            admin_url: None,
            doc_url: None,
            action: Some(FixAction { kind, targets }),
        }
    }

    pub fn with_admin_url(mut self, url: impl Into<String>) -> Self {
        self.admin_url = Some(url.into());
        self
    }

    pub fn with_doc_url(mut self, url: impl Into<String>) -> Self {
        self.doc_url = Some(url.into());
        self
    }

    pub fn fix_type(&self) -> FixType {
        self.fix_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn admin_url(&self) -> Option<&str> {
        self.admin_url.as_deref()
    }

    pub fn doc_url(&self) -> Option<&str> {
        self.doc_url.as_deref()
    }

    pub fn action(&self) -> Option<&FixAction> {
        self.action.as_ref()
    }
}

/// A finding. The ID always names a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    id: String,
    title: String,
    severity: Severity,
    category: Category,
    description: String,
    remediation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
    pass: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<FixDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<AuthorityScope>,
}

impl Suggestion {
    /// A failing finding for `info`. Use [`Suggestion::passed`] to flip it.
    pub fn new(
        info: &CheckInfo,
        severity: Severity,
        description: impl Into<String>,
        remediation: impl Into<String>,
    ) -> Self {
        Self {
            id: info.id.to_string(),
            title: info.title.to_string(),
            severity,
            category: info.category,
            description: description.into(),
            remediation: remediation.into(),
            details: Vec::new(),
            pass: false,
            fix: None,
            scope: None,
        }
    }

    /// Mark as passing. A passing finding never carries a fix.
    pub fn passed(mut self) -> Self {
        self.pass = true;
        self.fix = None;
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Ignored on a passing finding.
    pub fn with_fix(mut self, fix: FixDescriptor) -> Self {
        if !self.pass {
            self.fix = Some(fix);
        }
        self
    }

    pub fn with_scope(mut self, scope: AuthorityScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn remediation(&self) -> &str {
        &self.remediation
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn is_pass(&self) -> bool {
        self.pass
    }

    pub fn fix(&self) -> Option<&FixDescriptor> {
        self.fix.as_ref()
    }

    pub fn scope(&self) -> Option<AuthorityScope> {
        self.scope
    }
}
