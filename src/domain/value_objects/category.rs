//! Category value object - the seven check groupings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Check category. Declaration order is the order categories run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Category {
    #[serde(rename = "Access Controls")]
    #[value(name = "acl", alias = "access-control")]
    AccessControl,
    #[serde(rename = "Authentication & Keys")]
    #[value(name = "auth", alias = "authentication")]
    Authentication,
    #[serde(rename = "Device Security")]
    #[value(name = "device", alias = "devices")]
    DeviceSecurity,
    #[serde(rename = "Network Exposure")]
    #[value(name = "network", alias = "net")]
    NetworkExposure,
    #[serde(rename = "SSH & Device Posture")]
    #[value(name = "ssh")]
    SshSecurity,
    #[serde(rename = "Logging & Admin")]
    #[value(name = "logging", aliases = ["log", "admin"])]
    LoggingAdmin,
    #[serde(rename = "DNS Configuration")]
    #[value(name = "dns")]
    DnsConfiguration,
}

impl Category {
    /// Fixed run order.
    pub const ALL: [Category; 7] = [
        Category::AccessControl,
        Category::Authentication,
        Category::DeviceSecurity,
        Category::NetworkExposure,
        Category::SshSecurity,
        Category::LoggingAdmin,
        Category::DnsConfiguration,
    ];

    /// Display name, also the serialized form.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::AccessControl => "Access Controls",
            Category::Authentication => "Authentication & Keys",
            Category::DeviceSecurity => "Device Security",
            Category::NetworkExposure => "Network Exposure",
            Category::SshSecurity => "SSH & Device Posture",
            Category::LoggingAdmin => "Logging & Admin",
            Category::DnsConfiguration => "DNS Configuration",
        }
    }

    /// ID prefix of the category's checks, used for the `<PREFIX>-ERR`
    /// placeholder finding.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Category::AccessControl => "ACL",
            Category::Authentication => "AUTH",
            Category::DeviceSecurity => "DEV",
            Category::NetworkExposure => "NET",
            Category::SshSecurity => "SSH",
            Category::LoggingAdmin => "LOG",
            Category::DnsConfiguration => "DNS",
        }
    }

    /// ID of the placeholder finding emitted when the category cannot run.
    pub fn error_id(&self) -> String {
        format!("{}-ERR", self.id_prefix())
    }

    /// Short lowercase name accepted on the command line.
    pub fn short_name(&self) -> &'static str {
        match self {
            Category::AccessControl => "acl",
            Category::Authentication => "auth",
            Category::DeviceSecurity => "device",
            Category::NetworkExposure => "network",
            Category::SshSecurity => "ssh",
            Category::LoggingAdmin => "logging",
            Category::DnsConfiguration => "dns",
        }
    }

    /// Parse a short name, prefix, or display name (case-insensitive).
    pub fn parse(value: &str) -> Option<Category> {
        let needle = value.trim().to_ascii_lowercase();
        Category::ALL.into_iter().find(|c| {
            c.short_name() == needle
                || c.id_prefix().eq_ignore_ascii_case(&needle)
                || c.display_name().eq_ignore_ascii_case(&needle)
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_ids_follow_prefix() {
        assert_eq!(Category::DeviceSecurity.error_id(), "DEV-ERR");
        assert_eq!(Category::DnsConfiguration.error_id(), "DNS-ERR");
    }

    #[test]
    fn parse_accepts_short_name_and_prefix() {
        assert_eq!(Category::parse("ssh"), Some(Category::SshSecurity));
        assert_eq!(Category::parse("AUTH"), Some(Category::Authentication));
        assert_eq!(Category::parse("Device Security"), Some(Category::DeviceSecurity));
        assert_eq!(Category::parse("firewall"), None);
    }

    #[test]
    fn serializes_display_name() {
        let json = serde_json::to_string(&Category::LoggingAdmin).unwrap();
        assert_eq!(json, r#""Logging & Admin""#);
    }
}
