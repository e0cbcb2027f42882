//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;
use std::time::Duration;

use crate::application::{AuditUseCase, FixEngine};
use crate::config::Config;
use crate::domain::entities::CheckRegistry;
use crate::domain::ports::{
    AuditLog, FixEventSink, FixPrompt, LockProbe, NoLockProbe, NullAuditLog, TailnetApi,
};
use crate::error::{AuditError, AuditResult};
use crate::infrastructure::{Credentials, HttpTailnetClient, JsonlAuditLog, LocalLockProbe};

/// Create the admin API client from config and environment credentials.
///
/// Missing or unusable credentials are an authentication failure before
/// any request is made.
pub fn create_api(config: &Config) -> AuditResult<Arc<dyn TailnetApi>> {
    let credentials = Credentials::from_env().map_err(AuditError::authentication)?;
    let client = HttpTailnetClient::new(&config.api, credentials).map_err(|source| {
        AuditError::DataFetch {
            scope: "HTTP client".to_string(),
            source,
        }
    })?;
    Ok(Arc::new(client))
}

/// Local Tailnet Lock probe, or a disabled one per `[audit] local_lock_probe`.
pub fn create_lock_probe(config: &Config) -> Arc<dyn LockProbe> {
    if config.audit.local_lock_probe {
        Arc::new(LocalLockProbe::new(Duration::from_secs(config.api.timeout_secs)))
    } else {
        Arc::new(NoLockProbe)
    }
}

/// Create an audit use case with all dependencies wired up
pub fn create_audit_use_case(
    api: Arc<dyn TailnetApi>,
    config: &Config,
    registry: &'static CheckRegistry,
) -> AuditUseCase {
    AuditUseCase::new(api, create_lock_probe(config), registry)
}

/// Audit log for fix sessions; a null log when disabled.
pub fn create_audit_log(config: &Config, disabled: bool) -> Arc<dyn AuditLog> {
    match config.audit_log_path() {
        Some(path) if !disabled => Arc::new(JsonlAuditLog::new(path)),
        _ => Arc::new(NullAuditLog),
    }
}

/// Create a fix engine with all dependencies wired up
pub fn create_fix_engine(
    api: Arc<dyn TailnetApi>,
    config: &Config,
    no_audit_log: bool,
    prompt: Arc<dyn FixPrompt>,
    events: Arc<dyn FixEventSink>,
) -> FixEngine {
    FixEngine::new(api)
        .with_prompt(prompt)
        .with_audit_log(create_audit_log(config, no_audit_log))
        .with_events(events)
}
