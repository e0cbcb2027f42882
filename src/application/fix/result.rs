//! Fix Result

use crate::error::AuditError;

/// Outcome counters of one fix session
#[derive(Debug, Default)]
pub struct FixResult {
    /// Mutations issued successfully
    pub applied: usize,
    /// Mutations that would have been issued (dry run)
    pub dry_run: usize,
    /// API fixes only shown (preview mode)
    pub previewed: usize,
    /// API fixes not applied (declined, unsafe for auto, or after quit)
    pub skipped: usize,
    /// Manual fixes surfaced as guidance
    pub manual: usize,
    /// One `AuditError::FixExecution` per failed mutation
    pub failures: Vec<AuditError>,
    /// The session stopped early on cancellation
    pub cancelled: bool,
}

impl FixResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
