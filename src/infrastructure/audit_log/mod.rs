//! Audit log implementations

mod jsonl;

pub use jsonl::JsonlAuditLog;
