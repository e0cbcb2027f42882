//! Access-control policy document
//!
//! Only the parts the auditors read are modelled; unknown keys are ignored
//! so newer policy features never break decoding.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Key under a node attribute's `app` map that declares app connectors.
pub const APP_CONNECTORS_KEY: &str = "tailscale.com/app-connectors";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default)]
    pub acls: Vec<AclRule>,
    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub tag_owners: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub auto_approvers: AutoApprovers,
    #[serde(default)]
    pub ssh: Vec<SshRule>,
    #[serde(default)]
    pub node_attrs: Vec<NodeAttr>,
    #[serde(default)]
    pub tests: Vec<Value>,
    #[serde(default)]
    pub ssh_tests: Vec<Value>,
    #[serde(default)]
    pub postures: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub default_src_posture: Vec<String>,
}

/// Legacy `acls` entry. Older policies spell `src`/`dst` as `users`/`ports`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AclRule {
    #[serde(default)]
    pub action: String,
    #[serde(default, alias = "users")]
    pub src: Vec<String>,
    #[serde(default, alias = "ports")]
    pub dst: Vec<String>,
    #[serde(default)]
    pub proto: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Grant {
    #[serde(default)]
    pub src: Vec<String>,
    #[serde(default)]
    pub dst: Vec<String>,
    #[serde(default)]
    pub ip: Vec<String>,
    #[serde(default)]
    pub via: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoApprovers {
    #[serde(default)]
    pub routes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub exit_node: Vec<String>,
}

impl AutoApprovers {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.exit_node.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshRule {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub src: Vec<String>,
    #[serde(default)]
    pub dst: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub check_period: Option<String>,
    #[serde(default)]
    pub recorder: Vec<String>,
    #[serde(default)]
    pub enforce_recorder: bool,
}

impl SshRule {
    pub fn is_accept(&self) -> bool {
        self.action.eq_ignore_ascii_case("accept")
    }

    pub fn is_check(&self) -> bool {
        self.action.eq_ignore_ascii_case("check")
    }

    pub fn allows_root(&self) -> bool {
        self.users.iter().any(|u| u == "root")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NodeAttr {
    #[serde(default)]
    pub target: Vec<String>,
    #[serde(default)]
    pub attr: Vec<String>,
    #[serde(default)]
    pub app: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConnector {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub connectors: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

impl Policy {
    /// Every `src` entry across acls, grants and ssh rules.
    pub fn all_sources(&self) -> impl Iterator<Item = &str> {
        self.acls
            .iter()
            .flat_map(|r| r.src.iter())
            .chain(self.grants.iter().flat_map(|g| g.src.iter()))
            .chain(self.ssh.iter().flat_map(|r| r.src.iter()))
            .map(String::as_str)
    }

    /// Node attributes whose `attr` list contains `name`.
    pub fn node_attrs_with<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a NodeAttr> {
        self.node_attrs
            .iter()
            .filter(move |n| n.attr.iter().any(|a| a == name))
    }

    /// App connectors declared through node attributes. Malformed entries
    /// are skipped.
    pub fn app_connectors(&self) -> Vec<AppConnector> {
        self.node_attrs
            .iter()
            .filter_map(|n| n.app.get(APP_CONNECTORS_KEY))
            .filter_map(|v| serde_json::from_value::<Vec<AppConnector>>(v.clone()).ok())
            .flatten()
            .collect()
    }

    /// True if any acl or grant destination reaches `autogroup:internet`.
    pub fn grants_internet_access(&self) -> bool {
        self.acls
            .iter()
            .flat_map(|r| r.dst.iter())
            .chain(self.grants.iter().flat_map(|g| g.dst.iter()))
            .any(|d| d.starts_with("autogroup:internet"))
    }
}
