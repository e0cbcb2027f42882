//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod audit_log;
pub mod fix_events;
pub mod fix_prompt;
pub mod tailnet_api;

pub use audit_log::{AuditLog, AuditLogEntry, FixOutcome, NullAuditLog};
pub use fix_events::{FixEvent, FixEventSink, NoopFixEventSink, SkipReason};
pub use fix_prompt::{DeclinePrompt, FixDecision, FixPrompt, FixPromptContext};
pub use tailnet_api::{ApiError, ApiResult, LockProbe, NoLockProbe, TailnetApi};
