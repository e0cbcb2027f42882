//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `api/` - Tailscale admin API client and local Tailnet Lock probe
//! - `audit_log/` - JSON Lines audit log
//! - `events/` - NDJSON fix event sink
//! - `prompt/` - Terminal prompt for interactive fixes

pub mod api;
pub mod audit_log;
pub mod events;
pub mod prompt;

// Re-export for convenience
pub use api::{Credentials, HttpTailnetClient, LocalLockProbe};
pub use audit_log::JsonlAuditLog;
pub use events::JsonEventSink;
pub use prompt::InteractivePrompt;
