//! tailaudit - security auditor for Tailscale tailnets
//!
//! tailaudit reads a tailnet's policy file, devices, auth keys, DNS and
//! settings through the admin API, runs a fixed catalog of checks over
//! them, and produces an ordered report of findings. Findings that carry
//! an API fix can be previewed, applied interactively, auto-applied when
//! safe, or dry-run, with every mutation recorded in an audit log.

pub mod application;
pub mod audit;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{AuditOptions, AuditUseCase, CancelToken, FixEngine, FixResult, ReportFilter};
pub use config::Config;
pub use domain::entities::{AuditReport, CheckRegistry, Suggestion, Summary};
pub use domain::value_objects::{Category, FixMode, Severity};
pub use error::{AuditError, AuditResult};
