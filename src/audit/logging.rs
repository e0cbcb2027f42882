//! Logging and administration checks
//!
//! Most of these cover console-only settings the API does not expose.
//! They always report as failing advisories carrying a manual fix, so the
//! operator sees them once per audit.

use super::{admin_url, doc_url, CategoryAuditor, CheckContext, CheckDef, Evidence, Outcome};
use crate::domain::entities::FixDescriptor;
use crate::domain::tailnet::{Policy, TailnetSettings};
use crate::domain::value_objects::{Category, Severity};

/// Tailnet settings (when fetchable) plus the policy, for posture rules.
#[derive(Debug, Clone, Default)]
pub struct LoggingInput {
    pub settings: Option<TailnetSettings>,
    pub policy: Policy,
}

pub struct LoggingAuditor;

impl CategoryAuditor for LoggingAuditor {
    type Input = LoggingInput;

    fn category(&self) -> Category {
        Category::LoggingAdmin
    }

    fn checks(&self) -> &'static [CheckDef<LoggingInput>] {
        CHECKS
    }
}

const CHECKS: &[CheckDef<LoggingInput>] = &[
    CheckDef { id: "LOG-001", severity: Severity::Medium, run: flow_logs },
    CheckDef { id: "LOG-002", severity: Severity::Low, run: log_streaming },
    CheckDef { id: "LOG-003", severity: Severity::Info, run: audit_log_limits },
    CheckDef { id: "LOG-004", severity: Severity::Info, run: failed_logins },
    CheckDef { id: "LOG-005", severity: Severity::Low, run: webhook_secrets },
    CheckDef { id: "LOG-006", severity: Severity::Low, run: oauth_clients },
    CheckDef { id: "LOG-007", severity: Severity::Low, run: scim_keys },
    CheckDef { id: "LOG-008", severity: Severity::Info, run: passkey_admin },
    CheckDef { id: "LOG-009", severity: Severity::Medium, run: idp_mfa },
    CheckDef { id: "LOG-010", severity: Severity::Info, run: dns_rebinding },
    CheckDef { id: "LOG-011", severity: Severity::Info, run: security_contact },
    CheckDef { id: "LOG-012", severity: Severity::Info, run: critical_webhooks },
    CheckDef { id: "USER-001", severity: Severity::Info, run: user_roles },
    CheckDef { id: "DEV-013", severity: Severity::Low, run: device_posture },
];

fn advisory(description: &str, remediation: &str, fix: FixDescriptor) -> Outcome {
    Outcome::Fail(Evidence::new(description, remediation).with_fix(fix))
}

fn console(description: &str, admin: &str, doc: &str) -> FixDescriptor {
    FixDescriptor::manual(description)
        .with_admin_url(admin_url(admin))
        .with_doc_url(doc_url(doc))
}

fn flow_logs(input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    let Some(settings) = &input.settings else {
        return Outcome::Omitted;
    };
    if settings.network_flow_logging_on {
        return Outcome::Pass(Evidence::new("Network flow logs are enabled.", ""));
    }
    advisory(
        "Network flow logs are off. Connections between devices are not recorded, so \
         lateral movement cannot be reconstructed after an incident.",
        "Enable network flow logs.",
        console("Enable network flow logs", "logs/network", "1219/network-flow-logs"),
    )
}

fn log_streaming(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "Configuration audit logs and flow logs are retained for a limited period only.",
        "Stream logs to a SIEM or object storage for long-term retention.",
        console("Configure log streaming", "logs", "1255/log-streaming"),
    )
}

fn audit_log_limits(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "Configuration audit logs record admin changes, not data-plane activity such as \
         SSH sessions or connections.",
        "Combine audit logs with flow logs and SSH session recording.",
        console("Review audit log coverage", "logs", "1203/audit-logging"),
    )
}

fn failed_logins(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "Failed login attempts are only visible in the identity provider.",
        "Monitor and alert on failed logins in your identity provider.",
        FixDescriptor::manual("Set up failed-login alerts in the identity provider")
            .with_doc_url(doc_url("1013/sso-providers")),
    )
}

fn webhook_secrets(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "Webhook signing secrets do not expire on their own.",
        "Rotate webhook secrets periodically.",
        console("Rotate webhook secrets", "settings/webhooks", "1213/webhooks"),
    )
}

fn oauth_clients(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "OAuth clients keep working after the user who created them is removed.",
        "Review OAuth clients and delete those without a current owner.",
        console("Review OAuth clients", "settings/oauth", "1215/oauth-clients"),
    )
}

fn scim_keys(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "SCIM API keys used for user provisioning do not expire.",
        "Rotate SCIM keys periodically and after staff changes.",
        console("Rotate SCIM keys", "settings/user-management", "1180/sso-okta-scim"),
    )
}

fn passkey_admin(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "If the identity provider is unavailable, no administrator can sign in to repair \
         the tailnet.",
        "Create a passkey-authenticated backup admin account.",
        console("Add a passkey backup admin", "users", "1269/passkeys"),
    )
}

fn idp_mfa(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "Tailnet access is only as strong as identity provider authentication.",
        "Require multi-factor authentication for every user in the identity provider.",
        FixDescriptor::manual("Enforce MFA in the identity provider")
            .with_doc_url(doc_url("1013/sso-providers")),
    )
}

fn dns_rebinding(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "Web services on tailnet devices can be reached through DNS rebinding from a \
         malicious website.",
        "Validate the Host header on services listening on tailnet addresses.",
        FixDescriptor::manual("Validate Host headers on tailnet services")
            .with_doc_url(doc_url("1081/magicdns")),
    )
}

fn security_contact(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "Security notices are sent to the configured security contact.",
        "Set a monitored security contact email.",
        console("Set the security contact", "settings/general", "1224/contact-preferences"),
    )
}

fn critical_webhooks(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "Critical events such as new devices or policy changes can go unnoticed without \
         notifications.",
        "Configure webhooks for node and policy events.",
        console("Configure event webhooks", "settings/webhooks", "1213/webhooks"),
    )
}

fn user_roles(_input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    advisory(
        "Admin roles accumulate over time and ownership of the tailnet is easy to lose track of.",
        "Review user roles and make sure at least two people hold the owner or admin role.",
        console("Review user roles", "users", "1138/user-roles"),
    )
}

fn device_posture(input: &LoggingInput, _ctx: &CheckContext) -> Outcome {
    let policy = &input.policy;
    let mut details: Vec<String> = policy.postures.keys().cloned().collect();
    if !policy.default_src_posture.is_empty() {
        details.push(format!("defaultSrcPosture: {}", policy.default_src_posture.join(", ")));
    }
    if !details.is_empty() {
        return Outcome::Pass(
            Evidence::new("Device posture conditions are defined.", "").with_details(details),
        );
    }

    if let Some(settings) = &input.settings {
        details.push(format!(
            "posture identity collection: {}",
            if settings.posture_identity_collection_on { "on" } else { "off" }
        ));
    }
    Outcome::Fail(
        Evidence::new(
            "No device posture conditions are defined. Access is granted regardless of OS \
             version or device management state.",
            "Define postures and require them on sensitive destinations.",
        )
        .with_details(details)
        .with_fix(console("Define device postures", "acls/file", "1288/device-posture")),
    )
}
