//! Error types for tailaudit
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entities::RegistryError;
use crate::domain::ports::ApiError;

/// Result type alias for tailaudit operations
pub type AuditResult<T> = Result<T, AuditError>;

/// Guidance printed with every authentication failure.
pub const AUTH_GUIDANCE: &str = "Check that TSKEY contains a valid API key, or that \
TS_OAUTH_CLIENT_ID and TS_OAUTH_CLIENT_SECRET are set.\n\
Generate a new key at: https://login.tailscale.com/admin/settings/keys";

/// Main error type for audit and remediation operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Credentials were rejected (or missing). The run is aborted.
    #[error("authentication failed: {source}\n\n{guidance}")]
    Authentication {
        #[source]
        source: ApiError,
        guidance: &'static str,
    },

    /// A fetch failed for one category or for the shared policy document
    #[error("failed to fetch {scope}: {source}")]
    DataFetch {
        scope: String,
        #[source]
        source: ApiError,
    },

    /// A fetched document could not be parsed
    #[error("could not parse policy document: {message}")]
    Parse { message: String },

    /// One or more `--checks` names did not resolve
    #[error("unknown check(s): {}", names.join(", "))]
    UnknownCheckSelector { names: Vec<String> },

    /// Unknown `--category` name
    #[error("unknown category '{name}' (expected one of: {expected})")]
    UnknownCategory { name: String, expected: String },

    /// A remediation call failed
    #[error("fix for {check_id} on {target} failed: {message}")]
    FixExecution {
        check_id: String,
        target: String,
        message: String,
    },

    /// The run was cancelled before it finished
    #[error("audit cancelled")]
    Cancelled,

    /// The check catalog failed its startup self-check
    #[error("check registry is invalid: {0}")]
    Registry(#[from] RegistryError),

    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// Wrap an API error that rejected our credentials.
    pub fn authentication(source: ApiError) -> Self {
        AuditError::Authentication {
            source,
            guidance: AUTH_GUIDANCE,
        }
    }

    /// True when the audit could not run at all (as opposed to running and
    /// finding problems).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AuditError::FixExecution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_checks_lists_every_name() {
        let err = AuditError::UnknownCheckSelector {
            names: vec!["bogus-1".to_string(), "bogus-2".to_string()],
        };
        assert_eq!(err.to_string(), "unknown check(s): bogus-1, bogus-2");
    }

    #[test]
    fn test_error_display_authentication_includes_guidance() {
        let err = AuditError::authentication(ApiError::Unauthorized {
            status: 401,
            message: "API token invalid".to_string(),
        });
        let text = err.to_string();
        assert!(text.starts_with("authentication failed: "));
        assert!(text.contains("API token invalid"));
        assert!(text.contains("TSKEY"));
    }

    #[test]
    fn test_fix_execution_is_not_fatal() {
        let err = AuditError::FixExecution {
            check_id: "DEV-004".to_string(),
            target: "old-server".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(AuditError::Cancelled.is_fatal());
    }
}
