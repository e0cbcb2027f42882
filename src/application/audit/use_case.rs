//! Audit Use Case
//!
//! Orchestrates one audit run:
//! 1. Fetch the shared policy document (once, even when no selected
//!    category reads it, since it is also the credential check)
//! 2. Fetch each category's own data and run its auditor, in fixed order
//! 3. Assemble the report and compute the summary
//!
//! An authentication failure on the shared fetch aborts the run. Every
//! other fetch failure becomes a `<CATEGORY>-ERR` finding and the run
//! continues. Cancellation discards the partial report.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::audit::{
    AclAuditor, AuthAuditor, CategoryAuditor, CheckContext, DeviceAuditor, DeviceInput,
    DnsAuditor, LoggingAuditor, LoggingInput, NetworkAuditor, NetworkInput, SshAuditor,
};
use crate::domain::entities::{
    AuditReport, CheckInfo, CheckRegistry, RegistryError, ReportBuilder, Suggestion,
};
use crate::domain::ports::{ApiError, ApiResult, LockProbe, TailnetApi};
use crate::domain::tailnet::{parse_policy, AuthKey, Device, LockStatus, Policy, TailnetSettings};
use crate::domain::value_objects::{Category, Severity};
use crate::error::{AuditError, AuditResult};

use super::options::AuditOptions;
use crate::application::cancel::CancelToken;

const PARSE_WARNING_ID: &str = "ACL-PARSE";

/// Checks that read the local Tailnet Lock probe.
const LOCK_CHECKS: [&str; 2] = ["DEV-010", "DEV-012"];

/// Audit use case - one snapshot of one tailnet
pub struct AuditUseCase {
    api: Arc<dyn TailnetApi>,
    lock_probe: Arc<dyn LockProbe>,
    registry: &'static CheckRegistry,
}

impl AuditUseCase {
    pub fn new(
        api: Arc<dyn TailnetApi>,
        lock_probe: Arc<dyn LockProbe>,
        registry: &'static CheckRegistry,
    ) -> Self {
        Self {
            api,
            lock_probe,
            registry,
        }
    }

    /// Execute the audit.
    ///
    /// Returns a report whenever authentication succeeds. Returns
    /// `AuditError::Authentication` if the policy fetch is rejected and
    /// `AuditError::Cancelled` if `cancel` fires first.
    pub fn execute(&self, options: &AuditOptions, cancel: &CancelToken) -> AuditResult<AuditReport> {
        let now = options.now.unwrap_or_else(Utc::now);
        let tailnet = self.api.tailnet().to_string();
        let ctx = CheckContext {
            now,
            thresholds: options.thresholds.clone(),
            tailnet: tailnet.clone(),
        };
        let mut report = ReportBuilder::new(tailnet.as_str(), now);

        let active = |category: Category, checks: bool| options.includes_category(category) && checks;
        let selection = &options.selection;
        let run_acl = active(Category::AccessControl, selection.any_of(AclAuditor.checks()));
        let run_auth = active(Category::Authentication, selection.any_of(AuthAuditor.checks()));
        let run_dev = active(Category::DeviceSecurity, selection.any_of(DeviceAuditor.checks()));
        let run_net = active(Category::NetworkExposure, selection.any_of(NetworkAuditor.checks()));
        let run_ssh = active(Category::SshSecurity, selection.any_of(SshAuditor.checks()));
        let run_log = active(Category::LoggingAdmin, selection.any_of(LoggingAuditor.checks()));
        let run_dns = active(Category::DnsConfiguration, selection.any_of(DnsAuditor.checks()));

        info!(tailnet = %tailnet, "starting audit");

        // Shared policy document. Always fetched: rejected credentials
        // must abort the run whatever the selection.
        let api = Arc::clone(&self.api);
        let fetched = match cancel.run(move || api.policy_document())? {
            Err(e) if e.is_auth() => return Err(AuditError::authentication(e)),
            fetched => fetched,
        };
        let policy = if run_acl || run_net || run_ssh || run_log {
            self.load_policy(fetched, &mut report)?
        } else {
            if let Err(e) = &fetched {
                debug!(error = %e, "policy document unavailable; no selected check reads it");
            }
            None
        };
        let shared_policy = policy.clone().unwrap_or_default();

        // Access controls
        if run_acl {
            if let Some(policy) = &policy {
                self.run(&AclAuditor, policy, &ctx, options, &mut report)?;
            }
        }

        // Auth keys
        if run_auth {
            cancel.check()?;
            let api = Arc::clone(&self.api);
            match cancel.run(move || fetch_keys(api.as_ref()))? {
                Ok(keys) => self.run(&AuthAuditor, &keys, &ctx, options, &mut report)?,
                Err(e) => report.push(self.placeholder(Category::Authentication, &e)?),
            }
        }

        // Devices, shared with the network checks
        let mut devices: Option<ApiResult<Vec<Device>>> = None;
        if run_dev || run_net {
            let api = Arc::clone(&self.api);
            devices = Some(cancel.run(move || api.devices())?);
        }
        let settings = if run_dev || run_log {
            self.load_settings(cancel)?
        } else {
            None
        };

        if run_dev {
            match &devices {
                Some(Ok(list)) => {
                    let lock = if LOCK_CHECKS.iter().any(|id| selection.includes(id)) {
                        self.load_lock_status(cancel)?
                    } else {
                        None
                    };
                    let input = DeviceInput {
                        devices: list.clone(),
                        settings: settings.clone(),
                        lock,
                    };
                    self.run(&DeviceAuditor, &input, &ctx, options, &mut report)?;
                }
                Some(Err(e)) => report.push(self.placeholder(Category::DeviceSecurity, e)?),
                None => {}
            }
        }

        // Network exposure
        if run_net {
            cancel.check()?;
            let input = NetworkInput {
                policy: shared_policy.clone(),
                devices: devices.and_then(Result::ok),
            };
            self.run(&NetworkAuditor, &input, &ctx, options, &mut report)?;
        }

        // SSH
        if run_ssh {
            cancel.check()?;
            self.run(&SshAuditor, &shared_policy, &ctx, options, &mut report)?;
        }

        // Logging and admin
        if run_log {
            cancel.check()?;
            let input = LoggingInput {
                settings,
                policy: shared_policy,
            };
            self.run(&LoggingAuditor, &input, &ctx, options, &mut report)?;
        }

        // DNS
        if run_dns {
            let api = Arc::clone(&self.api);
            match cancel.run(move || api.dns_config())? {
                Ok(dns) => self.run(&DnsAuditor, &dns, &ctx, options, &mut report)?,
                Err(e) => report.push(self.placeholder(Category::DnsConfiguration, &e)?),
            }
        }

        cancel.check()?;
        let report = report.finish();
        info!(
            findings = report.summary().total,
            failing = report.summary().failing(),
            "audit finished"
        );
        Ok(report)
    }

    /// Parse the fetched policy document.
    ///
    /// `Some(policy)` when the document was fetched, even if it failed to
    /// parse (an empty policy plus an `ACL-PARSE` warning). `None` when the
    /// fetch failed (an `ACL-ERR` is recorded).
    fn load_policy(
        &self,
        fetched: ApiResult<String>,
        report: &mut ReportBuilder,
    ) -> AuditResult<Option<Policy>> {
        let raw = match fetched {
            Ok(raw) => raw,
            Err(e) => {
                let info = self.info(&Category::AccessControl.error_id())?;
                warn!(error = %e, "policy document unavailable");
                report.push(Suggestion::new(
                    info,
                    Severity::Medium,
                    format!(
                        "Failed to retrieve the policy document: {e}. Access control checks \
                         were skipped and policy-dependent checks ran against an empty policy."
                    ),
                    "Verify the API credentials can read the policy file.",
                ));
                return Ok(None);
            }
        };

        match parse_policy(&raw) {
            Ok(policy) => {
                debug!(
                    acls = policy.acls.len(),
                    grants = policy.grants.len(),
                    ssh = policy.ssh.len(),
                    "policy document parsed"
                );
                Ok(Some(policy))
            }
            Err(message) => {
                warn!(error = %message, "policy document could not be parsed");
                let info = self.info(PARSE_WARNING_ID)?;
                report.push(Suggestion::new(
                    info,
                    Severity::Low,
                    format!(
                        "The policy document could not be parsed: {message}. Checks ran \
                         against an empty policy and may be incomplete."
                    ),
                    "Validate the policy file in the admin console.",
                ));
                Ok(Some(Policy::default()))
            }
        }
    }

    /// Settings feed optional checks; a failure only omits them.
    fn load_settings(&self, cancel: &CancelToken) -> AuditResult<Option<TailnetSettings>> {
        let api = Arc::clone(&self.api);
        match cancel.run(move || api.settings())? {
            Ok(settings) => Ok(Some(settings)),
            Err(e) => {
                warn!(error = %e, "tailnet settings unavailable; dependent checks omitted");
                Ok(None)
            }
        }
    }

    fn load_lock_status(&self, cancel: &CancelToken) -> AuditResult<Option<LockStatus>> {
        let probe = Arc::clone(&self.lock_probe);
        match cancel.run(move || probe.lock_status())? {
            Ok(status) => Ok(Some(status)),
            Err(e) => {
                warn!(error = %e, "Tailnet Lock status unavailable; lock checks omitted");
                Ok(None)
            }
        }
    }

    fn run<A: CategoryAuditor>(
        &self,
        auditor: &A,
        input: &A::Input,
        ctx: &CheckContext,
        options: &AuditOptions,
        report: &mut ReportBuilder,
    ) -> AuditResult<()> {
        let findings = auditor.audit(self.registry, input, ctx, &options.selection)?;
        report.extend(findings);
        Ok(())
    }

    fn info(&self, id: &str) -> AuditResult<&CheckInfo> {
        self.registry
            .get(id)
            .ok_or_else(|| RegistryError::Unregistered(id.to_string()).into())
    }

    /// The single finding standing in for a category that could not run.
    fn placeholder(&self, category: Category, error: &ApiError) -> AuditResult<Suggestion> {
        warn!(category = %category, error = %error, "category could not be audited");
        let info = self.info(&category.error_id())?;
        Ok(Suggestion::new(
            info,
            Severity::Medium,
            format!("Error during {category} audit: {error}"),
            "Verify the API credentials can read this data and that the API is reachable.",
        ))
    }
}

fn fetch_keys(api: &dyn TailnetApi) -> ApiResult<Vec<AuthKey>> {
    api.key_ids()?.iter().map(|id| api.key(id)).collect()
}
