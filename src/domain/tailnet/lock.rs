//! Tailnet Lock status observed on the local node

use serde::Deserialize;

use crate::domain::value_objects::AuthorityScope;

/// Subset of `tailscale lock status --json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LockStatusDoc {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub node_key_signed: bool,
    #[serde(default)]
    pub filtered_peers: Vec<FilteredPeer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilteredPeer {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "StableID")]
    pub stable_id: String,
}

/// Subset of `tailscale status --json` naming the local node's tailnet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalStatusDoc {
    #[serde(default)]
    pub current_tailnet: Option<CurrentTailnet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentTailnet {
    #[serde(default)]
    pub name: String,
}

/// Lock status plus the tailnet the observing node belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockStatus {
    pub enabled: bool,
    pub node_key_signed: bool,
    pub awaiting_signature: Vec<String>,
    pub local_tailnet: Option<String>,
}

impl LockStatus {
    pub fn from_docs(lock: LockStatusDoc, status: Option<LocalStatusDoc>) -> Self {
        Self {
            enabled: lock.enabled,
            node_key_signed: lock.node_key_signed,
            awaiting_signature: lock
                .filtered_peers
                .into_iter()
                .map(|p| if p.name.is_empty() { p.stable_id } else { p.name })
                .collect(),
            local_tailnet: status
                .and_then(|s| s.current_tailnet)
                .map(|t| t.name)
                .filter(|n| !n.is_empty()),
        }
    }

    /// Whether this observation describes the audited tailnet.
    ///
    /// Only an exact (case-insensitive) name match counts. The `-`
    /// placeholder never matches because the real name is unknown.
    pub fn scope_for(&self, audited_tailnet: &str) -> AuthorityScope {
        match &self.local_tailnet {
            Some(local) if audited_tailnet != "-" && local.eq_ignore_ascii_case(audited_tailnet) => {
                AuthorityScope::Tailnet
            }
            _ => AuthorityScope::LocalNode,
        }
    }
}
