//! Tailnet API Port
//!
//! Read and mutate operations the auditor needs from the data source.
//! `HttpTailnetClient` talks to the admin API; tests use in-memory fakes.

use thiserror::Error;

use crate::domain::tailnet::{
    AuthKey, Device, DnsConfig, KeyCapabilities, LockStatus, TailnetSettings,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure reported by the data source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No credentials were configured.
    #[error("no credentials: set TSKEY or TS_OAUTH_CLIENT_ID and TS_OAUTH_CLIENT_SECRET")]
    MissingCredentials,

    /// Credentials were rejected (401/403 or token exchange refused).
    #[error("HTTP {status} Unauthorized: {message}")]
    Unauthorized { status: u16, message: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    /// The source cannot answer at all (e.g. local CLI missing).
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    /// Authentication-class failure. Fatal when hit on the shared fetch.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ApiError::MissingCredentials | ApiError::Unauthorized { .. }
        )
    }
}

/// The remote tailnet under audit.
///
/// Every call blocks and is bounded by the implementation's timeout.
/// Mutations are issued at most once per call and never retried.
pub trait TailnetApi: Send + Sync {
    /// Tailnet name used in requests, `-` for the credential's default.
    fn tailnet(&self) -> &str;

    /// Raw policy document (HuJSON).
    fn policy_document(&self) -> ApiResult<String>;

    fn devices(&self) -> ApiResult<Vec<Device>>;

    fn key_ids(&self) -> ApiResult<Vec<String>>;

    fn key(&self, id: &str) -> ApiResult<AuthKey>;

    fn dns_config(&self) -> ApiResult<DnsConfig>;

    fn settings(&self) -> ApiResult<TailnetSettings>;

    fn delete_key(&self, id: &str) -> ApiResult<()>;

    fn delete_device(&self, id: &str) -> ApiResult<()>;

    fn authorize_device(&self, id: &str) -> ApiResult<()>;

    fn set_device_tags(&self, id: &str, tags: &[String]) -> ApiResult<()>;

    /// Create an auth key; returns the new key's ID.
    fn create_key(
        &self,
        capabilities: &KeyCapabilities,
        expiry_seconds: Option<u64>,
        description: &str,
    ) -> ApiResult<String>;
}

/// Tailnet Lock status as seen by the node running the audit.
pub trait LockProbe: Send + Sync {
    fn lock_status(&self) -> ApiResult<LockStatus>;
}

/// Probe used when local inspection is disabled or impossible.
pub struct NoLockProbe;

impl LockProbe for NoLockProbe {
    fn lock_status(&self) -> ApiResult<LockStatus> {
        Err(ApiError::Unavailable("local Tailnet Lock probe disabled".to_string()))
    }
}
