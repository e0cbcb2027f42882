//! Check registry entity
//!
//! The fixed catalog of checks, with case-insensitive lookup by ID or by a
//! slug derived from the title. Built once per process and read-only after.

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

use crate::domain::value_objects::Category;
use crate::error::AuditError;

/// Whether a catalog entry is a user-selectable check or a diagnostic
/// placeholder the orchestrator emits when a category cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Check,
    Diagnostic,
}

/// Static catalog row.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub category: Category,
    pub kind: CheckKind,
}

const fn check(id: &'static str, title: &'static str, category: Category) -> CatalogEntry {
    CatalogEntry {
        id,
        title,
        category,
        kind: CheckKind::Check,
    }
}

const fn diagnostic(id: &'static str, title: &'static str, category: Category) -> CatalogEntry {
    CatalogEntry {
        id,
        title,
        category,
        kind: CheckKind::Diagnostic,
    }
}

use Category::*;

/// The compiled-in catalog, in report order within each category.
pub const CATALOG: &[CatalogEntry] = &[
    check("ACL-001", "Default 'allow all' policy active", AccessControl),
    check("ACL-002", "SSH autogroup:nonroot misconfiguration", AccessControl),
    check("ACL-003", "No ACL tests defined", AccessControl),
    check("ACL-004", "autogroup:member grants access to external users", AccessControl),
    check("ACL-005", "AutoApprovers bypass administrative route approval", AccessControl),
    check("ACL-006", "tagOwners grants tag privileges too broadly", AccessControl),
    check("ACL-007", "autogroup:danger-all grants access to everyone", AccessControl),
    check("ACL-008", "No groups defined in ACL policy", AccessControl),
    check("ACL-009", "Using legacy ACLs instead of grants", AccessControl),
    check("ACL-010", "Taildrop file sharing configuration", AccessControl),
    check("AUTH-001", "Reusable auth keys exist", Authentication),
    check("AUTH-002", "Auth keys with long expiry period", Authentication),
    check("AUTH-003", "Pre-authorized auth keys bypass device approval", Authentication),
    check("AUTH-004", "Non-ephemeral keys may be used for CI/CD", Authentication),
    check("DEV-001", "Tagged devices with key expiry disabled", DeviceSecurity),
    check("DEV-002", "User devices tagged", DeviceSecurity),
    check("DEV-003", "Outdated Tailscale clients", DeviceSecurity),
    check("DEV-004", "Stale devices not seen recently", DeviceSecurity),
    check("DEV-005", "Unauthorized devices pending approval", DeviceSecurity),
    check("DEV-006", "External devices in tailnet", DeviceSecurity),
    check("DEV-007", "Potentially sensitive machine names", DeviceSecurity),
    check("DEV-008", "Devices with long key expiry periods", DeviceSecurity),
    check("DEV-009", "Device approval configuration", DeviceSecurity),
    check("DEV-010", "Tailnet Lock not enabled", DeviceSecurity),
    check("DEV-011", "Unique users in tailnet", DeviceSecurity),
    check("DEV-012", "Nodes awaiting Tailnet Lock signature", DeviceSecurity),
    check("DEV-013", "Device posture configuration", LoggingAdmin),
    check("NET-001", "Funnel exposes services to public internet", NetworkExposure),
    check("NET-002", "Exit node access configuration", NetworkExposure),
    check("NET-003", "Subnet routes expose trust boundary", NetworkExposure),
    check("NET-004", "HTTPS certificates publish names to CT logs", NetworkExposure),
    check("NET-005", "Exit nodes can see all internet traffic", NetworkExposure),
    check("NET-006", "Tailscale Serve exposes services on tailnet", NetworkExposure),
    check("NET-007", "App connectors provide SaaS access", NetworkExposure),
    check("SSH-001", "SSH session recording not enforced", SshSecurity),
    check("SSH-002", "High-risk SSH access without check mode", SshSecurity),
    check("SSH-003", "Session recorder UI may be exposed", SshSecurity),
    check("SSH-004", "Tailscale SSH configuration", SshSecurity),
    check("LOG-001", "Network flow logs configuration", LoggingAdmin),
    check("LOG-002", "Log streaming for long-term retention", LoggingAdmin),
    check("LOG-003", "Audit log limitations", LoggingAdmin),
    check("LOG-004", "Failed login monitoring via IdP", LoggingAdmin),
    check("LOG-005", "Webhook secrets never expire", LoggingAdmin),
    check("LOG-006", "OAuth clients persist after user removal", LoggingAdmin),
    check("LOG-007", "SCIM API keys never expire", LoggingAdmin),
    check("LOG-008", "Passkey-authenticated backup admin", LoggingAdmin),
    check("LOG-009", "MFA enforcement in identity provider", LoggingAdmin),
    check("LOG-010", "DNS rebinding attack protection", LoggingAdmin),
    check("LOG-011", "Security contact email configuration", LoggingAdmin),
    check("LOG-012", "Webhooks for critical events", LoggingAdmin),
    check("USER-001", "Review user roles and ownership", LoggingAdmin),
    check("DNS-001", "MagicDNS configuration", DnsConfiguration),
    check("DNS-002", "Search domains pushed to every device", DnsConfiguration),
    check("DNS-003", "Public resolvers receive tailnet DNS queries", DnsConfiguration),
    diagnostic("ACL-PARSE", "Policy document parse warning", AccessControl),
    diagnostic("ACL-ERR", "Access control audit error", AccessControl),
    diagnostic("AUTH-ERR", "Auth key audit error", Authentication),
    diagnostic("DEV-ERR", "Device audit error", DeviceSecurity),
    diagnostic("NET-ERR", "Network audit error", NetworkExposure),
    diagnostic("SSH-ERR", "SSH audit error", SshSecurity),
    diagnostic("LOG-ERR", "Logging audit error", LoggingAdmin),
    diagnostic("DNS-ERR", "DNS audit error", DnsConfiguration),
];

/// Metadata about one check. Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInfo {
    pub id: &'static str,
    pub slug: String,
    pub title: &'static str,
    pub category: Category,
    pub kind: CheckKind,
}

/// Catalog defects. These are startup failures, never runtime conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate check ID '{0}'")]
    DuplicateId(String),

    #[error("checks {first} and {second} both derive slug '{slug}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("check {0} derives an empty slug")]
    EmptySlug(String),

    #[error("check {0} is not in the catalog")]
    Unregistered(String),
}

/// Derive a slug from a check title.
///
/// Drops a trailing parenthetical qualifier, lowercases, removes
/// apostrophes, collapses every other non-alphanumeric run into a single
/// `-`, and trims separators from both ends.
pub fn slugify(title: &str) -> String {
    let mut base = title.trim();
    if base.ends_with(')') {
        if let Some(idx) = base.rfind('(') {
            if idx > 0 {
                base = base[..idx].trim_end();
            }
        }
    }

    let mut slug = String::with_capacity(base.len());
    let mut pending_sep = false;
    for ch in base.chars() {
        if ch == '\'' || ch == '\u{2019}' {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Lookup tables over the catalog.
#[derive(Debug)]
pub struct CheckRegistry {
    checks: Vec<CheckInfo>,
    by_id: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
}

static GLOBAL: OnceLock<Result<CheckRegistry, RegistryError>> = OnceLock::new();

impl CheckRegistry {
    /// Build a registry from catalog rows, rejecting duplicate IDs or slugs.
    pub fn build(entries: &[CatalogEntry]) -> Result<Self, RegistryError> {
        let mut checks = Vec::with_capacity(entries.len());
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_slug = HashMap::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            let slug = slugify(entry.title);
            if slug.is_empty() {
                return Err(RegistryError::EmptySlug(entry.id.to_string()));
            }
            if by_id.insert(entry.id.to_ascii_uppercase(), idx).is_some() {
                return Err(RegistryError::DuplicateId(entry.id.to_string()));
            }
            if let Some(prev) = by_slug.insert(slug.clone(), idx) {
                let first: &CheckInfo = &checks[prev];
                return Err(RegistryError::DuplicateSlug {
                    slug,
                    first: first.id.to_string(),
                    second: entry.id.to_string(),
                });
            }
            checks.push(CheckInfo {
                id: entry.id,
                slug,
                title: entry.title,
                category: entry.category,
                kind: entry.kind,
            });
        }

        Ok(Self {
            checks,
            by_id,
            by_slug,
        })
    }

    /// The process-wide registry built from [`CATALOG`].
    ///
    /// The first call performs the self-check; call it at startup so a
    /// catalog defect surfaces before any audit work.
    pub fn global() -> Result<&'static CheckRegistry, RegistryError> {
        GLOBAL
            .get_or_init(|| CheckRegistry::build(CATALOG))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Look up any entry (checks and diagnostics) by ID, ignoring case.
    pub fn get(&self, id: &str) -> Option<&CheckInfo> {
        self.by_id
            .get(&id.trim().to_ascii_uppercase())
            .map(|&idx| &self.checks[idx])
    }

    /// Resolve a user-supplied name to a canonical check ID.
    ///
    /// Tries the ID first, then the slug, both case-insensitively.
    /// Diagnostic entries are not selectable.
    pub fn resolve(&self, name: &str) -> Option<&'static str> {
        let name = name.trim();
        let idx = self
            .by_id
            .get(&name.to_ascii_uppercase())
            .or_else(|| self.by_slug.get(&name.to_ascii_lowercase()))?;
        let info = &self.checks[*idx];
        (info.kind == CheckKind::Check).then_some(info.id)
    }

    /// Resolve every name, or fail listing all names that did not resolve.
    ///
    /// Blank names are ignored; duplicates collapse to one ID.
    pub fn resolve_all<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&'static str>, AuditError> {
        let mut ids: Vec<&'static str> = Vec::new();
        let mut unknown = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match self.resolve(name) {
                Some(id) => {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                None => unknown.push(name.to_string()),
            }
        }

        if unknown.is_empty() {
            Ok(ids)
        } else {
            Err(AuditError::UnknownCheckSelector { names: unknown })
        }
    }

    /// Selectable checks in catalog order.
    pub fn checks(&self) -> impl Iterator<Item = &CheckInfo> {
        self.checks.iter().filter(|c| c.kind == CheckKind::Check)
    }

    /// Every entry, diagnostics included.
    pub fn all(&self) -> &[CheckInfo] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
