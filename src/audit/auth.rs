//! Auth key checks

// Check functions share the `fn(&Input, &CheckContext)` signature.
#![allow(clippy::ptr_arg)]

use std::sync::OnceLock;

use regex::Regex;

use super::{admin_url, doc_url, offenders, CategoryAuditor, CheckContext, CheckDef, Evidence, Outcome};
use crate::domain::entities::{FixDescriptor, FixKind, FixTarget, Mutation};
use crate::domain::tailnet::{AuthKey, KeyCapabilities};
use crate::domain::value_objects::{Category, Severity};

pub struct AuthAuditor;

impl CategoryAuditor for AuthAuditor {
    type Input = Vec<AuthKey>;

    fn category(&self) -> Category {
        Category::Authentication
    }

    fn checks(&self) -> &'static [CheckDef<Vec<AuthKey>>] {
        CHECKS
    }
}

const CHECKS: &[CheckDef<Vec<AuthKey>>] = &[
    CheckDef { id: "AUTH-001", severity: Severity::High, run: reusable_keys },
    CheckDef { id: "AUTH-002", severity: Severity::Medium, run: long_lived_keys },
    CheckDef { id: "AUTH-003", severity: Severity::Medium, run: preauthorized_keys },
    CheckDef { id: "AUTH-004", severity: Severity::Low, run: ci_keys_not_ephemeral },
];

/// Usable auth keys: not revoked, not invalid, not expired.
fn live_keys<'a>(keys: &'a [AuthKey], ctx: &'a CheckContext) -> impl Iterator<Item = &'a AuthKey> {
    keys.iter()
        .filter(|k| k.is_auth_key() && k.is_active())
        .filter(move |k| k.expires_at().map_or(true, |e| e > ctx.now))
}

fn revoke_fix(description: &str, keys: &[&AuthKey]) -> FixDescriptor {
    let targets = keys
        .iter()
        .map(|k| FixTarget {
            id: k.id.clone(),
            label: k.label(),
            mutation: Mutation::DeleteKey {
                key_id: k.id.clone(),
            },
        })
        .collect();
    FixDescriptor::api(description, FixKind::RevokeAuthKey, targets)
        .with_admin_url(admin_url("settings/keys"))
        .with_doc_url(doc_url("1085/auth-keys"))
}

fn reusable_keys(keys: &Vec<AuthKey>, ctx: &CheckContext) -> Outcome {
    let hits: Vec<&AuthKey> = live_keys(keys, ctx)
        .filter(|k| k.capabilities.create().reusable)
        .collect();
    let details = hits.iter().map(|k| k.label()).collect();

    offenders(
        details,
        || Evidence::new("No reusable auth keys exist.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} reusable auth key(s) can register any number of devices. A leaked key \
                     lets an attacker join machines until it expires.",
                    d.len()
                ),
                "Revoke reusable keys that are not needed and prefer single-use or ephemeral keys.",
            )
            .with_fix(revoke_fix("Revoke reusable auth keys", &hits))
        },
    )
}

fn long_lived_keys(keys: &Vec<AuthKey>, ctx: &CheckContext) -> Outcome {
    let max = ctx.thresholds.auth_key_max_days;
    let hits: Vec<(&AuthKey, i64)> = live_keys(keys, ctx)
        .filter_map(|k| k.lifetime_days().map(|days| (k, days)))
        .filter(|(_, days)| *days > max)
        .collect();
    let details = hits
        .iter()
        .map(|(k, days)| format!("{}: valid for {days} days", k.label()))
        .collect();
    let targets: Vec<&AuthKey> = hits.iter().map(|(k, _)| *k).collect();

    offenders(
        details,
        || Evidence::new(format!("All auth keys expire within {max} days."), ""),
        |d| {
            Evidence::new(
                format!("{} auth key(s) are valid for more than {max} days.", d.len()),
                "Revoke long-lived keys and issue replacements with a shorter expiry.",
            )
            .with_fix(revoke_fix("Revoke long-lived auth keys", &targets))
        },
    )
}

fn preauthorized_keys(keys: &Vec<AuthKey>, ctx: &CheckContext) -> Outcome {
    let hits: Vec<&AuthKey> = live_keys(keys, ctx)
        .filter(|k| k.capabilities.create().preauthorized)
        .collect();
    let details = hits.iter().map(|k| k.label()).collect();

    offenders(
        details,
        || Evidence::new("No pre-authorized auth keys exist.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} pre-authorized key(s) add devices without passing device approval.",
                    d.len()
                ),
                "Revoke pre-authorized keys unless device approval is deliberately bypassed.",
            )
            .with_fix(revoke_fix("Revoke pre-authorized auth keys", &hits))
        },
    )
}

fn ci_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(ci|cd|ci/cd|github|gitlab|pipeline|runner|actions|jenkins|build)\b")
            .expect("static pattern")
    })
}

fn looks_like_ci(key: &AuthKey) -> bool {
    let caps = key.capabilities.create();
    ci_pattern().is_match(&key.description)
        || (caps.reusable && caps.tags.iter().any(|t| ci_pattern().is_match(t)))
}

fn ci_keys_not_ephemeral(keys: &Vec<AuthKey>, ctx: &CheckContext) -> Outcome {
    let hits: Vec<&AuthKey> = live_keys(keys, ctx)
        .filter(|k| !k.capabilities.create().ephemeral && looks_like_ci(k))
        .collect();
    let details = hits.iter().map(|k| k.label()).collect();
    let expiry = u64::try_from(ctx.thresholds.auth_key_max_days.max(1)).unwrap_or(90) * 86_400;

    offenders(
        details,
        || Evidence::new("No CI/CD keys are missing the ephemeral flag.", ""),
        |d| {
            let targets = hits
                .iter()
                .map(|k| FixTarget {
                    id: k.id.clone(),
                    label: k.label(),
                    mutation: Mutation::CreateKey {
                        capabilities: KeyCapabilities::ephemeral_single_use(
                            k.capabilities.create().tags.clone(),
                        ),
                        expiry_seconds: Some(expiry),
                        description: format!("ephemeral replacement for {}", k.id),
                    },
                })
                .collect();
            Evidence::new(
                format!(
                    "{} key(s) that look like CI/CD keys are not ephemeral. Build runners \
                     registered with them remain in the tailnet after the job ends.",
                    d.len()
                ),
                "Use ephemeral keys for CI/CD so nodes are removed when they go offline.",
            )
            .with_fix(
                FixDescriptor::api(
                    "Create ephemeral replacement keys",
                    FixKind::CreateEphemeralKey,
                    targets,
                )
                .with_admin_url(admin_url("settings/keys"))
                .with_doc_url(doc_url("1111/ephemeral-nodes")),
            )
        },
    )
}
