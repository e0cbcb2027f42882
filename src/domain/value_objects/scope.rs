//! Authority scope value object
//!
//! Most findings describe the remote tailnet under audit. A few (Tailnet
//! Lock) are read from the node running the audit, which may belong to a
//! different tailnet. Those findings carry an explicit scope tag.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorityScope {
    /// Observed through the admin API of the audited tailnet.
    Tailnet,
    /// Observed on the local node; may not be the audited tailnet.
    LocalNode,
}

impl AuthorityScope {
    pub fn describe(&self) -> &'static str {
        match self {
            AuthorityScope::Tailnet => "scope: audited tailnet",
            AuthorityScope::LocalNode => {
                "scope: local node running the audit (may differ from the audited tailnet)"
            }
        }
    }
}
