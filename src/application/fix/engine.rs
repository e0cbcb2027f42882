//! Fix Engine
//!
//! Walks the failing findings of a report in order. Manual fixes are only
//! surfaced. API fixes are previewed, prompted for, auto-applied when
//! their kind is safe, or dry-run, depending on the mode. Each mutation is
//! issued at most once and a failure never stops the session.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::application::cancel::CancelToken;
use crate::domain::entities::{AuditReport, FixKind, FixTarget, FixType, Mutation};
use crate::domain::ports::{
    ApiResult, AuditLog, AuditLogEntry, DeclinePrompt, FixDecision, FixEvent, FixEventSink,
    FixOutcome, FixPrompt, FixPromptContext, NoopFixEventSink, NullAuditLog, SkipReason,
    TailnetApi,
};
use crate::domain::value_objects::FixMode;
use crate::error::AuditError;

use super::result::FixResult;

/// One API fix target awaiting a decision.
struct PendingFix<'r> {
    check_id: &'r str,
    title: &'r str,
    kind: FixKind,
    target: &'r FixTarget,
}

pub struct FixEngine {
    api: Arc<dyn TailnetApi>,
    prompt: Arc<dyn FixPrompt>,
    audit_log: Arc<dyn AuditLog>,
    events: Arc<dyn FixEventSink>,
}

impl FixEngine {
    pub fn new(api: Arc<dyn TailnetApi>) -> Self {
        Self {
            api,
            prompt: Arc::new(DeclinePrompt),
            audit_log: Arc::new(NullAuditLog),
            events: Arc::new(NoopFixEventSink),
        }
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn FixPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_audit_log(mut self, audit_log: Arc<dyn AuditLog>) -> Self {
        self.audit_log = audit_log;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn FixEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Run one fix session over `report`.
    pub fn execute(&self, report: &AuditReport, mode: FixMode, cancel: &CancelToken) -> FixResult {
        let mut result = FixResult::new();
        let mut pending = Vec::new();

        for suggestion in report.failing() {
            let Some(fix) = suggestion.fix() else {
                continue;
            };
            match (fix.fix_type(), fix.action()) {
                (FixType::Api, Some(action)) => {
                    pending.extend(action.targets.iter().map(|target| PendingFix {
                        check_id: suggestion.id(),
                        title: suggestion.title(),
                        kind: action.kind,
                        target,
                    }));
                }
                _ => {
                    result.manual += 1;
                    self.events.on_event(FixEvent::ManualGuidance {
                        check_id: suggestion.id().to_string(),
                        description: fix.description().to_string(),
                        admin_url: fix.admin_url().map(str::to_string),
                        doc_url: fix.doc_url().map(str::to_string),
                    });
                }
            }
        }

        info!(mode = %mode, api_fixes = pending.len(), manual_fixes = result.manual, "fix session started");
        self.events.on_event(FixEvent::Started {
            mode,
            api_fixes: pending.len(),
            manual_fixes: result.manual,
        });

        let tailnet = report.tailnet();
        let mut apply_all: HashSet<FixKind> = HashSet::new();
        let mut quit = false;
        let total = pending.len();

        for (idx, fix) in pending.iter().enumerate() {
            if !quit && cancel.is_cancelled() {
                warn!("fix session cancelled");
                result.cancelled = true;
                quit = true;
            }
            if quit {
                self.skip(fix, SkipReason::Quit, &mut result);
                continue;
            }

            match mode {
                FixMode::PreviewOnly => {
                    result.previewed += 1;
                    self.events.on_event(FixEvent::Preview {
                        check_id: fix.check_id.to_string(),
                        kind: fix.kind,
                        target: fix.target.label.clone(),
                        safe_for_auto: fix.kind.is_safe_for_auto(),
                    });
                }
                FixMode::DryRun => self.dry_run(tailnet, fix, &mut result),
                FixMode::Auto => {
                    if fix.kind.is_safe_for_auto() {
                        self.apply(tailnet, fix, &mut result);
                    } else {
                        self.skip(fix, SkipReason::NotSafeForAuto, &mut result);
                    }
                }
                FixMode::Interactive => {
                    let decision = if apply_all.contains(&fix.kind) {
                        FixDecision::Apply
                    } else {
                        self.prompt.decide(&FixPromptContext {
                            check_id: fix.check_id,
                            title: fix.title,
                            kind: fix.kind,
                            target: fix.target,
                            index: idx + 1,
                            total,
                        })
                    };
                    match decision {
                        FixDecision::Apply => self.apply(tailnet, fix, &mut result),
                        FixDecision::ApplyAllOfKind => {
                            apply_all.insert(fix.kind);
                            self.apply(tailnet, fix, &mut result);
                        }
                        FixDecision::Skip => self.skip(fix, SkipReason::Declined, &mut result),
                        FixDecision::Quit => {
                            quit = true;
                            self.skip(fix, SkipReason::Quit, &mut result);
                        }
                    }
                }
            }
        }

        info!(
            applied = result.applied,
            failed = result.failed(),
            skipped = result.skipped,
            dry_run = result.dry_run,
            "fix session finished"
        );
        self.events.on_event(FixEvent::Finished {
            applied: result.applied,
            failed: result.failed(),
            skipped: result.skipped,
            dry_run: result.dry_run,
        });
        result
    }

    fn apply(&self, tailnet: &str, fix: &PendingFix, result: &mut FixResult) {
        debug!(check = fix.check_id, action = fix.kind.action_name(), target = %fix.target.id, "applying fix");
        match execute_mutation(self.api.as_ref(), &fix.target.mutation) {
            Ok(()) => {
                result.applied += 1;
                self.record(tailnet, fix, FixOutcome::Success, None);
                self.events.on_event(FixEvent::Applied {
                    check_id: fix.check_id.to_string(),
                    kind: fix.kind,
                    target: fix.target.label.clone(),
                });
            }
            Err(e) => {
                warn!(check = fix.check_id, target = %fix.target.id, error = %e, "fix failed");
                let message = e.to_string();
                self.record(tailnet, fix, FixOutcome::Failure, Some(message.clone()));
                self.events.on_event(FixEvent::Failed {
                    check_id: fix.check_id.to_string(),
                    kind: fix.kind,
                    target: fix.target.label.clone(),
                    error: message.clone(),
                });
                result.failures.push(AuditError::FixExecution {
                    check_id: fix.check_id.to_string(),
                    target: fix.target.id.clone(),
                    message,
                });
            }
        }
    }

    fn dry_run(&self, tailnet: &str, fix: &PendingFix, result: &mut FixResult) {
        result.dry_run += 1;
        self.record(tailnet, fix, FixOutcome::DryRun, None);
        self.events.on_event(FixEvent::WouldApply {
            check_id: fix.check_id.to_string(),
            kind: fix.kind,
            target: fix.target.label.clone(),
        });
    }

    fn skip(&self, fix: &PendingFix, reason: SkipReason, result: &mut FixResult) {
        result.skipped += 1;
        self.events.on_event(FixEvent::Skipped {
            check_id: fix.check_id.to_string(),
            kind: fix.kind,
            target: fix.target.label.clone(),
            reason,
        });
    }

    /// Audit log write failures are reported, never fatal.
    fn record(&self, tailnet: &str, fix: &PendingFix, outcome: FixOutcome, error: Option<String>) {
        let entry = AuditLogEntry {
            timestamp: Utc::now(),
            tailnet: tailnet.to_string(),
            check_id: fix.check_id.to_string(),
            action: fix.kind.action_name().to_string(),
            target: fix.target.id.clone(),
            outcome,
            error,
        };
        if let Err(e) = self.audit_log.append(&entry) {
            warn!(error = %e, "could not write audit log entry");
            self.events.on_event(FixEvent::AuditLogWarning {
                message: format!("could not write audit log entry: {e}"),
            });
        }
    }
}

/// Issue the call a [`Mutation`] is bound to, exactly once.
pub fn execute_mutation(api: &dyn TailnetApi, mutation: &Mutation) -> ApiResult<()> {
    match mutation {
        Mutation::DeleteKey { key_id } => api.delete_key(key_id),
        Mutation::DeleteDevice { device_id } => api.delete_device(device_id),
        Mutation::AuthorizeDevice { device_id } => api.authorize_device(device_id),
        Mutation::SetDeviceTags { device_id, tags } => api.set_device_tags(device_id, tags),
        Mutation::CreateKey {
            capabilities,
            expiry_seconds,
            description,
        } => {
            let id = api.create_key(capabilities, *expiry_seconds, description)?;
            info!(key = %id, "created replacement key");
            Ok(())
        }
    }
}
