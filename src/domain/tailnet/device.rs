//! Device inventory records

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub client_version: String,
    #[serde(default)]
    pub update_available: bool,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub last_seen: String,
    #[serde(default)]
    pub expires: String,
    #[serde(default)]
    pub key_expiry_disabled: bool,
    #[serde(default)]
    pub authorized: bool,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub advertised_routes: Vec<String>,
    #[serde(default)]
    pub enabled_routes: Vec<String>,
}

/// Operating systems that indicate a personal device.
const USER_DEVICE_OS: &[&str] = &["macos", "ios", "windows", "android"];

/// Hostname fragments that indicate a personal device.
const USER_DEVICE_HOSTNAMES: &[&str] = &["macbook", "laptop", "iphone", "ipad"];

impl Device {
    /// Short name for messages: hostname, else the first label of `name`.
    pub fn label(&self) -> &str {
        if !self.hostname.is_empty() {
            return &self.hostname;
        }
        self.name.split('.').next().unwrap_or(&self.name)
    }

    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_seen)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expires)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created)
    }

    /// Judged from OS and hostname only; tags are not considered.
    pub fn looks_like_user_device(&self) -> bool {
        let os = self.os.to_ascii_lowercase();
        if USER_DEVICE_OS.contains(&os.as_str()) {
            return true;
        }
        let host = self.hostname.to_ascii_lowercase();
        USER_DEVICE_HOSTNAMES.iter().any(|p| host.contains(p))
    }

    /// An untagged device that looks like a personal workstation or phone.
    pub fn is_dev_device(&self) -> bool {
        !self.is_tagged() && self.looks_like_user_device()
    }

    pub fn advertises_exit_node(&self) -> bool {
        self.advertised_routes
            .iter()
            .any(|r| r == "0.0.0.0/0" || r == "::/0")
    }

    /// Advertised routes excluding the exit-node default routes.
    pub fn subnet_routes(&self) -> impl Iterator<Item = &str> {
        self.advertised_routes
            .iter()
            .map(String::as_str)
            .filter(|r| *r != "0.0.0.0/0" && *r != "::/0")
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
