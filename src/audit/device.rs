//! Device inventory checks

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;

use super::{admin_url, doc_url, offenders, CategoryAuditor, CheckContext, CheckDef, Evidence, Outcome};
use crate::domain::entities::{FixDescriptor, FixKind, FixTarget, Mutation};
use crate::domain::tailnet::{Device, LockStatus, TailnetSettings};
use crate::domain::value_objects::{Category, Severity};

/// Everything the device checks read. Settings and lock status are
/// optional; checks that need them are omitted when absent.
#[derive(Debug, Clone, Default)]
pub struct DeviceInput {
    pub devices: Vec<Device>,
    pub settings: Option<TailnetSettings>,
    pub lock: Option<LockStatus>,
}

impl DeviceInput {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices,
            settings: None,
            lock: None,
        }
    }
}

pub struct DeviceAuditor;

impl CategoryAuditor for DeviceAuditor {
    type Input = DeviceInput;

    fn category(&self) -> Category {
        Category::DeviceSecurity
    }

    fn checks(&self) -> &'static [CheckDef<DeviceInput>] {
        CHECKS
    }
}

const CHECKS: &[CheckDef<DeviceInput>] = &[
    CheckDef { id: "DEV-001", severity: Severity::Medium, run: tagged_key_expiry_disabled },
    CheckDef { id: "DEV-002", severity: Severity::High, run: tagged_user_devices },
    CheckDef { id: "DEV-003", severity: Severity::Medium, run: outdated_clients },
    CheckDef { id: "DEV-004", severity: Severity::Medium, run: stale_devices },
    CheckDef { id: "DEV-005", severity: Severity::Medium, run: unauthorized_devices },
    CheckDef { id: "DEV-006", severity: Severity::Low, run: external_devices },
    CheckDef { id: "DEV-007", severity: Severity::Low, run: sensitive_names },
    CheckDef { id: "DEV-008", severity: Severity::Low, run: long_key_expiry },
    CheckDef { id: "DEV-009", severity: Severity::Medium, run: device_approval },
    CheckDef { id: "DEV-010", severity: Severity::Medium, run: tailnet_lock },
    CheckDef { id: "DEV-011", severity: Severity::Low, run: devices_per_user },
    CheckDef { id: "DEV-012", severity: Severity::Medium, run: awaiting_signature },
];

fn machines_fix(description: &str) -> FixDescriptor {
    FixDescriptor::manual(description).with_admin_url(admin_url("machines"))
}

fn device_target(device: &Device, mutation: Mutation) -> FixTarget {
    FixTarget {
        id: device.id.clone(),
        label: device.label().to_string(),
        mutation,
    }
}

fn tagged_key_expiry_disabled(input: &DeviceInput, _ctx: &CheckContext) -> Outcome {
    let details = input
        .devices
        .iter()
        .filter(|d| d.is_tagged() && d.key_expiry_disabled)
        .map(|d| format!("{} ({})", d.label(), d.tags.join(", ")))
        .collect();

    offenders(
        details,
        || Evidence::new("All tagged devices have key expiry enabled.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} tagged device(s) have key expiry disabled. A stolen node key for these \
                     devices stays valid indefinitely.",
                    d.len()
                ),
                "Re-enable key expiry on tagged devices and rotate keys through automation.",
            )
            .with_fix(
                machines_fix("Enable key expiry for each device")
                    .with_doc_url(doc_url("1028/key-expiry")),
            )
        },
    )
}

fn tagged_user_devices(input: &DeviceInput, _ctx: &CheckContext) -> Outcome {
    let hits: Vec<&Device> = input
        .devices
        .iter()
        .filter(|d| d.is_tagged() && d.looks_like_user_device())
        .collect();
    let details = hits
        .iter()
        .map(|d| format!("{} ({}, {})", d.label(), d.os, d.tags.join(", ")))
        .collect();

    offenders(
        details,
        || Evidence::new("No personal devices carry tags.", ""),
        |d| {
            let targets = hits
                .iter()
                .map(|dev| {
                    device_target(
                        dev,
                        Mutation::SetDeviceTags {
                            device_id: dev.id.clone(),
                            tags: Vec::new(),
                        },
                    )
                })
                .collect();
            Evidence::new(
                format!(
                    "{} personal device(s) are tagged. Tagging removes user identity, so \
                     whoever holds the laptop or phone acts with the tag's permissions.",
                    d.len()
                ),
                "Remove tags from personal devices and grant access to their users instead.",
            )
            .with_fix(
                FixDescriptor::api("Remove tags from personal devices", FixKind::ClearDeviceTags, targets)
                    .with_admin_url(admin_url("machines"))
                    .with_doc_url(doc_url("1068/tags")),
            )
        },
    )
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"v?(\d+)\.(\d+)").expect("static pattern"))
}

/// Extract `(major, minor)` from a client version string.
pub(crate) fn parse_version(version: &str) -> Option<(u32, u32)> {
    let caps = version_pattern().captures(version)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    Some((major, minor))
}

fn outdated_clients(input: &DeviceInput, ctx: &CheckContext) -> Outcome {
    let minimum = parse_version(&ctx.thresholds.min_client_version);
    let details = input
        .devices
        .iter()
        .filter(|d| !d.client_version.is_empty())
        .filter(|d| {
            let below = match (parse_version(&d.client_version), minimum) {
                (Some(have), Some(min)) => have < min,
                _ => false,
            };
            below || d.update_available
        })
        .map(|d| format!("{}: {}", d.label(), d.client_version))
        .collect();

    offenders(
        details,
        || Evidence::new("All clients are up to date.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} device(s) run an outdated client (older than {} or with an update \
                     available) and may miss security fixes.",
                    d.len(),
                    ctx.thresholds.min_client_version
                ),
                "Update these clients or enable auto-updates.",
            )
            .with_fix(
                machines_fix("Update Tailscale on each device")
                    .with_doc_url(doc_url("1067/update")),
            )
        },
    )
}

fn stale_devices(input: &DeviceInput, ctx: &CheckContext) -> Outcome {
    let days = ctx.thresholds.stale_device_days;
    let cutoff = ctx.now - Duration::days(days);
    let hits: Vec<(&Device, i64)> = input
        .devices
        .iter()
        .filter_map(|d| d.last_seen_at().map(|seen| (d, seen)))
        .filter(|(_, seen)| *seen < cutoff)
        .map(|(d, seen)| (d, (ctx.now - seen).num_days()))
        .collect();
    let details = hits
        .iter()
        .map(|(d, ago)| format!("{}: last seen {ago} days ago", d.label()))
        .collect();

    offenders(
        details,
        || Evidence::new(format!("All devices were seen in the last {days} days."), ""),
        |d| {
            let targets = hits
                .iter()
                .map(|(dev, _)| {
                    device_target(
                        dev,
                        Mutation::DeleteDevice {
                            device_id: dev.id.clone(),
                        },
                    )
                })
                .collect();
            Evidence::new(
                format!(
                    "{} device(s) have not been seen for more than {days} days. Their keys \
                     still grant access if the machine is recovered by someone else.",
                    d.len()
                ),
                "Remove devices that are no longer in use.",
            )
            .with_fix(
                FixDescriptor::api("Delete stale devices", FixKind::DeleteStaleDevice, targets)
                    .with_admin_url(admin_url("machines")),
            )
        },
    )
}

fn unauthorized_devices(input: &DeviceInput, _ctx: &CheckContext) -> Outcome {
    let hits: Vec<&Device> = input.devices.iter().filter(|d| !d.authorized).collect();
    let details = hits
        .iter()
        .map(|d| {
            if d.user.is_empty() {
                d.label().to_string()
            } else {
                format!("{} ({})", d.label(), d.user)
            }
        })
        .collect();

    offenders(
        details,
        || Evidence::new("No devices are pending approval.", ""),
        |d| {
            let targets = hits
                .iter()
                .map(|dev| {
                    device_target(
                        dev,
                        Mutation::AuthorizeDevice {
                            device_id: dev.id.clone(),
                        },
                    )
                })
                .collect();
            Evidence::new(
                format!("{} device(s) are waiting for approval.", d.len()),
                "Approve devices you recognise and delete the rest.",
            )
            .with_fix(
                FixDescriptor::api("Authorize pending devices", FixKind::AuthorizeDevice, targets)
                    .with_admin_url(admin_url("machines"))
                    .with_doc_url(doc_url("1099/device-approval")),
            )
        },
    )
}

fn external_devices(input: &DeviceInput, _ctx: &CheckContext) -> Outcome {
    let details = input
        .devices
        .iter()
        .filter(|d| d.is_external)
        .map(|d| format!("{} ({})", d.label(), d.user))
        .collect();

    offenders(
        details,
        || Evidence::new("No devices are shared in from other tailnets.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} device(s) are shared in from other tailnets and are managed outside \
                     your control.",
                    d.len()
                ),
                "Review shared devices and remove shares that are no longer needed.",
            )
            .with_fix(
                machines_fix("Review shared devices").with_doc_url(doc_url("1084/sharing")),
            )
        },
    )
}

const SENSITIVE_WORDS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "credential",
    "api-key",
    "apikey",
    "prod-db",
    "prod-database",
    "internal",
    "private",
    "confidential",
];

fn ip_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\d{1,3}(\.\d{1,3}){3}\b").expect("static pattern"))
}

/// Words are matched against the first DNS label only, so the tailnet
/// suffix of a MagicDNS name never triggers a hit.
fn sensitive_reason(name: &str) -> Option<String> {
    let lower = name.to_ascii_lowercase();
    let label = lower.split('.').next().unwrap_or(&lower);
    if let Some(word) = SENSITIVE_WORDS.iter().find(|w| label.contains(*w)) {
        return Some(format!("contains \"{word}\""));
    }
    ip_pattern()
        .is_match(&lower)
        .then(|| "contains an IP address".to_string())
}

fn sensitive_names(input: &DeviceInput, _ctx: &CheckContext) -> Outcome {
    let details = input
        .devices
        .iter()
        .filter_map(|d| {
            sensitive_reason(&d.name)
                .map(|why| format!("{}: {why}", d.name))
                .or_else(|| sensitive_reason(&d.hostname).map(|why| format!("{}: {why}", d.hostname)))
        })
        .collect();

    offenders(
        details,
        || Evidence::new("No machine names reveal sensitive information.", ""),
        |_| {
            Evidence::new(
                "Machine names are visible to every device in the tailnet and are published \
                 to certificate transparency logs when HTTPS is enabled. These names reveal \
                 infrastructure details.",
                "Rename machines to neutral names.",
            )
            .with_fix(
                machines_fix("Rename each machine").with_doc_url(doc_url("1098/machine-names")),
            )
        },
    )
}

fn long_key_expiry(input: &DeviceInput, ctx: &CheckContext) -> Outcome {
    let max = ctx.thresholds.device_key_max_days;
    let details = input
        .devices
        .iter()
        .filter(|d| !d.key_expiry_disabled)
        .filter_map(|d| d.expires_at().map(|e| (d, (e - ctx.now).num_days())))
        .filter(|(_, days)| *days > max)
        .map(|(d, days)| format!("{}: key expires in {days} days", d.label()))
        .collect();

    offenders(
        details,
        || Evidence::new(format!("No device keys are valid for more than {max} days."), ""),
        |d| {
            Evidence::new(
                format!("{} device key(s) remain valid for more than {max} days.", d.len()),
                "Shorten the key expiry period in tailnet settings.",
            )
            .with_fix(
                FixDescriptor::manual("Lower the device key expiry")
                    .with_admin_url(admin_url("settings/device-management"))
                    .with_doc_url(doc_url("1028/key-expiry")),
            )
        },
    )
}

fn device_approval(input: &DeviceInput, _ctx: &CheckContext) -> Outcome {
    let Some(settings) = &input.settings else {
        return Outcome::Omitted;
    };
    if settings.devices_approval_on {
        Outcome::Pass(Evidence::new("Device approval is required.", ""))
    } else {
        Outcome::Fail(
            Evidence::new(
                "Device approval is off. Anyone with valid credentials can add devices \
                 without administrator review.",
                "Turn on device approval.",
            )
            .with_fix(
                FixDescriptor::manual("Enable device approval")
                    .with_admin_url(admin_url("settings/device-management"))
                    .with_doc_url(doc_url("1099/device-approval")),
            ),
        )
    }
}

fn lock_fix(description: &str) -> FixDescriptor {
    FixDescriptor::manual(description)
        .with_admin_url(admin_url("settings/tailnet-lock"))
        .with_doc_url(doc_url("1226/tailnet-lock"))
}

fn tailnet_lock(input: &DeviceInput, ctx: &CheckContext) -> Outcome {
    let Some(lock) = &input.lock else {
        return Outcome::Omitted;
    };
    let scope = lock.scope_for(&ctx.tailnet);
    let scope_line = vec![scope.describe().to_string()];
    if lock.enabled {
        Outcome::Pass(
            Evidence::new("Tailnet Lock is enabled.", "")
                .with_details(scope_line)
                .with_scope(scope),
        )
    } else {
        Outcome::Fail(
            Evidence::new(
                "Tailnet Lock is not enabled. The coordination server can add nodes without \
                 a signature from a trusted key.",
                "Enable Tailnet Lock and distribute signing keys to trusted nodes.",
            )
            .with_details(scope_line)
            .with_scope(scope)
            .with_fix(lock_fix("Enable Tailnet Lock")),
        )
    }
}

fn devices_per_user(input: &DeviceInput, ctx: &CheckContext) -> Outcome {
    let max = ctx.thresholds.max_devices_per_user;
    let mut per_user: BTreeMap<&str, usize> = BTreeMap::new();
    for d in input.devices.iter().filter(|d| !d.is_tagged() && !d.user.is_empty()) {
        *per_user.entry(d.user.as_str()).or_default() += 1;
    }
    let users = per_user.len();
    let details = per_user
        .iter()
        .filter(|(_, count)| **count > max)
        .map(|(user, count)| format!("{user}: {count} devices"))
        .collect();

    offenders(
        details,
        || Evidence::new(format!("{users} unique user(s), none with more than {max} devices."), ""),
        |d| {
            Evidence::new(
                format!(
                    "{} user(s) own more than {max} devices. Each device is another place a \
                     credential can leak from.",
                    d.len()
                ),
                "Review these users' devices and remove those no longer needed.",
            )
            .with_fix(machines_fix("Review devices per user"))
        },
    )
}

fn awaiting_signature(input: &DeviceInput, ctx: &CheckContext) -> Outcome {
    let Some(lock) = input.lock.as_ref().filter(|l| l.enabled) else {
        return Outcome::Omitted;
    };
    let scope = lock.scope_for(&ctx.tailnet);
    let mut details = lock.awaiting_signature.clone();
    if details.is_empty() {
        return Outcome::Pass(
            Evidence::new("No nodes are waiting for a Tailnet Lock signature.", "")
                .with_details(vec![scope.describe().to_string()])
                .with_scope(scope),
        );
    }
    let count = details.len();
    details.push(scope.describe().to_string());
    Outcome::Fail(
        Evidence::new(
            format!("{count} node(s) are locked out until a trusted key signs them."),
            "Sign nodes you recognise with `tailscale lock sign` and remove the rest.",
        )
        .with_details(details)
        .with_scope(scope)
        .with_fix(lock_fix("Sign or remove locked-out nodes")),
    )
}
