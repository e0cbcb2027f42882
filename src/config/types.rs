//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Severity;
use crate::error::AuditResult;

use super::loader::{self, ConfigWarning};

pub const DEFAULT_API_URL: &str = "https://api.tailscale.com";

/// Admin API connection settings. Credentials are never read from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Tailnet to audit. `None` means the credential's default tailnet.
    #[serde(default)]
    pub tailnet: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            tailnet: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Limits the checks compare against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_stale_device_days")]
    pub stale_device_days: i64,

    #[serde(default = "default_auth_key_max_days")]
    pub auth_key_max_days: i64,

    #[serde(default = "default_device_key_max_days")]
    pub device_key_max_days: i64,

    #[serde(default = "default_max_devices_per_user")]
    pub max_devices_per_user: usize,

    /// Oldest acceptable client release, as `major.minor`.
    #[serde(default = "default_min_client_version")]
    pub min_client_version: String,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            stale_device_days: default_stale_device_days(),
            auth_key_max_days: default_auth_key_max_days(),
            device_key_max_days: default_device_key_max_days(),
            max_devices_per_user: default_max_devices_per_user(),
            min_client_version: default_min_client_version(),
        }
    }
}

fn default_stale_device_days() -> i64 {
    30
}

fn default_auth_key_max_days() -> i64 {
    90
}

fn default_device_key_max_days() -> i64 {
    180
}

fn default_max_devices_per_user() -> usize {
    10
}

fn default_min_client_version() -> String {
    "1.58".to_string()
}

/// Audit run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Hide findings below this severity.
    #[serde(default)]
    pub min_severity: Option<Severity>,

    /// Inspect the local `tailscale` CLI for Tailnet Lock status.
    #[serde(default = "default_true")]
    pub local_lock_probe: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            min_severity: None,
            local_lock_probe: true,
        }
    }
}

/// Fix session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixConfig {
    #[serde(default = "default_true")]
    pub audit_log: bool,

    #[serde(default)]
    pub audit_log_path: Option<PathBuf>,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            audit_log_path: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,

    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            unicode: true,
        }
    }
}

/// Color output mode
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub fix: FixConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> AuditResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> AuditResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (TAILAUDIT_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Where fix attempts are logged, or `None` when logging is off.
    pub fn audit_log_path(&self) -> Option<PathBuf> {
        if !self.fix.audit_log {
            return None;
        }
        self.fix
            .audit_log_path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("tailaudit").join("fix-audit.jsonl")))
    }

    /// Tailnet name for API requests.
    pub fn tailnet(&self) -> &str {
        match self.api.tailnet.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => "-",
        }
    }
}
