//! Fix Event Port
//!
//! Progress of a fix session, rendered as text or NDJSON by the binary.

use crate::domain::entities::FixKind;
use crate::domain::value_objects::FixMode;

/// Why a pending fix target was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The operator declined it.
    Declined,
    /// Auto mode only applies kinds classified safe.
    NotSafeForAuto,
    /// The session was ended early.
    Quit,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Declined => "declined",
            SkipReason::NotSafeForAuto => "not-safe-for-auto",
            SkipReason::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone)]
pub enum FixEvent {
    Started {
        mode: FixMode,
        api_fixes: usize,
        manual_fixes: usize,
    },

    /// An API fix target, shown in preview mode.
    Preview {
        check_id: String,
        kind: FixKind,
        target: String,
        safe_for_auto: bool,
    },

    /// A manual fix; nothing is executed.
    ManualGuidance {
        check_id: String,
        description: String,
        admin_url: Option<String>,
        doc_url: Option<String>,
    },

    Applied {
        check_id: String,
        kind: FixKind,
        target: String,
    },

    /// Dry run: the mutation that would have been issued.
    WouldApply {
        check_id: String,
        kind: FixKind,
        target: String,
    },

    Failed {
        check_id: String,
        kind: FixKind,
        target: String,
        error: String,
    },

    Skipped {
        check_id: String,
        kind: FixKind,
        target: String,
        reason: SkipReason,
    },

    /// The audit log could not be written. The session continues.
    AuditLogWarning { message: String },

    Finished {
        applied: usize,
        failed: usize,
        skipped: usize,
        dry_run: usize,
    },
}

pub trait FixEventSink: Send + Sync {
    fn on_event(&self, event: FixEvent);
}

/// No-op event sink for silent operation
pub struct NoopFixEventSink;

impl FixEventSink for NoopFixEventSink {
    fn on_event(&self, _event: FixEvent) {}
}
