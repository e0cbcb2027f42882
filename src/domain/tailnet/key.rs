//! Auth key inventory records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::device::parse_timestamp;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthKey {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_type: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub expires: String,
    #[serde(default)]
    pub revoked: String,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub capabilities: KeyCapabilities,
}

/// Capabilities as the key API nests them: `devices.create.{...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCapabilities {
    #[serde(default)]
    pub devices: DeviceCapabilities,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    #[serde(default)]
    pub create: CreateCapabilities,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCapabilities {
    #[serde(default)]
    pub reusable: bool,
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default)]
    pub preauthorized: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl KeyCapabilities {
    pub fn create(&self) -> &CreateCapabilities {
        &self.devices.create
    }

    /// Single-use, ephemeral, not preauthorized, carrying `tags`.
    pub fn ephemeral_single_use(tags: Vec<String>) -> Self {
        Self {
            devices: DeviceCapabilities {
                create: CreateCapabilities {
                    reusable: false,
                    ephemeral: true,
                    preauthorized: false,
                    tags,
                },
            },
        }
    }
}

impl AuthKey {
    /// Auth keys only; API access tokens and OAuth clients share the endpoint.
    pub fn is_auth_key(&self) -> bool {
        self.key_type.is_empty() || self.key_type == "auth"
    }

    pub fn is_active(&self) -> bool {
        self.revoked.is_empty() && !self.invalid
    }

    pub fn label(&self) -> String {
        if self.description.is_empty() {
            self.id.clone()
        } else {
            format!("{} ({})", self.id, self.description)
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expires)
    }

    /// Total validity period, when both ends are known.
    pub fn lifetime_days(&self) -> Option<i64> {
        Some((self.expires_at()? - self.created_at()?).num_days())
    }
}
