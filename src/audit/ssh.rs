//! Tailscale SSH checks

use std::collections::BTreeSet;

use super::{admin_url, doc_url, offenders, CategoryAuditor, CheckContext, CheckDef, Evidence, Outcome};
use crate::domain::entities::FixDescriptor;
use crate::domain::tailnet::{Policy, SshRule};
use crate::domain::value_objects::{Category, Severity};

pub struct SshAuditor;

impl CategoryAuditor for SshAuditor {
    type Input = Policy;

    fn category(&self) -> Category {
        Category::SshSecurity
    }

    fn checks(&self) -> &'static [CheckDef<Policy>] {
        CHECKS
    }
}

const CHECKS: &[CheckDef<Policy>] = &[
    CheckDef { id: "SSH-001", severity: Severity::Medium, run: recording_not_enforced },
    CheckDef { id: "SSH-002", severity: Severity::Medium, run: accept_without_check },
    CheckDef { id: "SSH-003", severity: Severity::Medium, run: recorder_exposure },
    CheckDef { id: "SSH-004", severity: Severity::Medium, run: broad_ssh_sources },
];

fn describe_rule(rule: &SshRule) -> String {
    format!(
        "{} -> {} as {}",
        rule.src.join(", "),
        rule.dst.join(", "),
        rule.users.join(", ")
    )
}

fn ssh_fix(description: &str, doc: &str) -> FixDescriptor {
    FixDescriptor::manual(description)
        .with_admin_url(admin_url("acls/file"))
        .with_doc_url(doc_url(doc))
}

fn recording_not_enforced(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    let details = policy
        .ssh
        .iter()
        .filter(|r| r.is_accept() || r.is_check())
        .filter(|r| r.recorder.is_empty() || !r.enforce_recorder)
        .map(describe_rule)
        .collect();

    offenders(
        details,
        || Evidence::new("Every SSH rule enforces session recording.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} SSH rule(s) allow sessions without enforced recording. Commands run \
                     over these sessions leave no record.",
                    d.len()
                ),
                "Add a recorder and set enforceRecorder on SSH rules.",
            )
            .with_fix(ssh_fix("Enforce session recording", "1246/tailscale-ssh-session-recording"))
        },
    )
}

fn accept_without_check(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    let hits: Vec<&SshRule> = policy.ssh.iter().filter(|r| r.is_accept()).collect();
    let root = hits.iter().any(|r| r.allows_root());
    let details = hits.iter().map(|r| describe_rule(r)).collect();

    offenders(
        details,
        || Evidence::new("SSH access requires check mode re-authentication.", ""),
        |d| {
            let evidence = Evidence::new(
                format!(
                    "{} SSH rule(s) accept sessions without check mode. A stolen device can \
                     open sessions without the user re-authenticating.",
                    d.len()
                ),
                "Use action \"check\" for SSH rules, especially those granting root.",
            )
            .with_fix(ssh_fix("Switch SSH rules to check mode", "1193/tailscale-ssh"));
            if root {
                evidence.with_severity(Severity::High)
            } else {
                evidence
            }
        },
    )
}

fn recorder_exposure(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    let recorders: BTreeSet<&str> = policy
        .ssh
        .iter()
        .flat_map(|r| r.recorder.iter())
        .map(String::as_str)
        .collect();
    if recorders.is_empty() {
        return Outcome::Omitted;
    }

    Outcome::Fail(
        Evidence::new(
            "Session recorders can serve a web UI with the full contents of recorded \
             sessions. Anyone who can reach the recorder can read them.",
            "Restrict access to recorder nodes to the administrators who review recordings.",
        )
        .with_details(recorders.into_iter().map(str::to_string).collect())
        .with_fix(ssh_fix("Restrict access to recorders", "1246/tailscale-ssh-session-recording")),
    )
}

fn is_broad_source(src: &str) -> bool {
    src == "*" || src.starts_with("autogroup:member")
}

fn broad_ssh_sources(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    let details = policy
        .ssh
        .iter()
        .filter(|r| r.src.iter().any(|s| is_broad_source(s)))
        .map(describe_rule)
        .collect();

    offenders(
        details,
        || Evidence::new("SSH rules are limited to specific users or groups.", ""),
        |d| {
            Evidence::new(
                format!("{} SSH rule(s) admit every member of the tailnet.", d.len()),
                "Restrict SSH sources to groups that administer the destination machines.",
            )
            .with_fix(ssh_fix("Narrow SSH sources", "1193/tailscale-ssh"))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::test_support::{check, run};
    use crate::domain::tailnet::parse_policy;

    fn policy(json: &str) -> Policy {
        parse_policy(json).unwrap()
    }

    #[test]
    fn no_ssh_rules_pass_and_recorder_check_is_omitted() {
        let findings = run(&SshAuditor, &Policy::default());
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|s| s.is_pass()));
    }

    #[test]
    fn accept_root_without_check_is_high() {
        let p = policy(
            r#"{"ssh":[{"action":"accept","src":["group:ops"],"dst":["tag:prod"],"users":["root"]}]}"#,
        );
        let s = check(&SshAuditor, &p, "SSH-002").unwrap();
        assert!(!s.is_pass());
        assert_eq!(s.severity(), Severity::High);
        assert_eq!(s.details(), ["group:ops -> tag:prod as root"]);
    }

    #[test]
    fn accept_nonroot_without_check_is_medium() {
        let p = policy(
            r#"{"ssh":[{"action":"accept","src":["group:ops"],"dst":["tag:prod"],"users":["ubuntu"]}]}"#,
        );
        assert_eq!(check(&SshAuditor, &p, "SSH-002").unwrap().severity(), Severity::Medium);
    }

    #[test]
    fn check_mode_rule_passes_ssh_002() {
        let p = policy(
            r#"{"ssh":[{"action":"check","src":["group:ops"],"dst":["tag:prod"],"users":["root"]}]}"#,
        );
        assert!(check(&SshAuditor, &p, "SSH-002").unwrap().is_pass());
    }

    #[test]
    fn recording_must_be_enforced() {
        let p = policy(
            r#"{"ssh":[
                {"action":"check","src":["group:ops"],"dst":["tag:prod"],"users":["root"],
                 "recorder":["tag:recorder"]},
                {"action":"check","src":["group:dba"],"dst":["tag:db"],"users":["postgres"],
                 "recorder":["tag:recorder"],"enforceRecorder":true}
            ]}"#,
        );
        let s = check(&SshAuditor, &p, "SSH-001").unwrap();
        assert_eq!(s.details(), ["group:ops -> tag:prod as root"]);

        let r = check(&SshAuditor, &p, "SSH-003").unwrap();
        assert!(!r.is_pass());
        assert_eq!(r.details(), ["tag:recorder"]);
    }

    #[test]
    fn member_sources_fail_ssh_004() {
        let p = policy(
            r#"{"ssh":[{"action":"check","src":["autogroup:member"],"dst":["autogroup:self"],"users":["autogroup:nonroot"]}]}"#,
        );
        assert!(!check(&SshAuditor, &p, "SSH-004").unwrap().is_pass());
    }
}
