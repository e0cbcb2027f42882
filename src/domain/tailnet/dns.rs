//! DNS configuration and tailnet-wide settings

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsConfig {
    pub magic_dns: bool,
    pub nameservers: Vec<String>,
    pub search_paths: Vec<String>,
}

/// Well-known public resolvers. Queries sent there leave the tailnet.
const PUBLIC_RESOLVERS: &[&str] = &[
    "8.8.8.8",
    "8.8.4.4",
    "1.1.1.1",
    "1.0.0.1",
    "9.9.9.9",
    "149.112.112.112",
    "208.67.222.222",
    "208.67.220.220",
    "2001:4860:4860::8888",
    "2001:4860:4860::8844",
    "2606:4700:4700::1111",
    "2606:4700:4700::1001",
];

impl DnsConfig {
    pub fn public_nameservers(&self) -> impl Iterator<Item = &str> {
        self.nameservers
            .iter()
            .map(String::as_str)
            .filter(|ns| PUBLIC_RESOLVERS.contains(ns))
    }
}

/// Tailnet settings as returned by the admin API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailnetSettings {
    #[serde(default)]
    pub devices_approval_on: bool,
    #[serde(default)]
    pub devices_auto_updates_on: bool,
    #[serde(default)]
    pub devices_key_duration_days: Option<u32>,
    #[serde(default)]
    pub users_approval_on: bool,
    #[serde(default)]
    pub network_flow_logging_on: bool,
    #[serde(default)]
    pub posture_identity_collection_on: bool,
}
