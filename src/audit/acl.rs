//! Access-control checks over the shared policy document

use super::{admin_url, doc_url, offenders, CategoryAuditor, CheckContext, CheckDef, Evidence, Outcome};
use crate::domain::entities::FixDescriptor;
use crate::domain::tailnet::Policy;
use crate::domain::value_objects::{Category, Severity};

pub struct AclAuditor;

impl CategoryAuditor for AclAuditor {
    type Input = Policy;

    fn category(&self) -> Category {
        Category::AccessControl
    }

    fn checks(&self) -> &'static [CheckDef<Policy>] {
        CHECKS
    }
}

const CHECKS: &[CheckDef<Policy>] = &[
    CheckDef { id: "ACL-001", severity: Severity::Critical, run: allow_all },
    CheckDef { id: "ACL-002", severity: Severity::High, run: ssh_nonroot_on_tags },
    CheckDef { id: "ACL-003", severity: Severity::Low, run: no_tests },
    CheckDef { id: "ACL-004", severity: Severity::Medium, run: member_sources },
    CheckDef { id: "ACL-005", severity: Severity::Medium, run: auto_approvers },
    CheckDef { id: "ACL-006", severity: Severity::High, run: broad_tag_owners },
    CheckDef { id: "ACL-007", severity: Severity::Critical, run: danger_all },
    CheckDef { id: "ACL-008", severity: Severity::Low, run: no_groups },
    CheckDef { id: "ACL-009", severity: Severity::Info, run: legacy_acls },
    CheckDef { id: "ACL-010", severity: Severity::Info, run: taildrop },
];

fn acl_fix(description: &str) -> FixDescriptor {
    FixDescriptor::manual(description)
        .with_admin_url(admin_url("acls"))
        .with_doc_url(doc_url("1018/acls"))
}

fn is_wildcard(entry: &str) -> bool {
    entry == "*"
}

fn allow_all(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    let mut details = Vec::new();
    for (i, rule) in policy.acls.iter().enumerate() {
        if rule.action.eq_ignore_ascii_case("accept")
            && rule.src.iter().any(|s| is_wildcard(s))
            && rule.dst.iter().any(|d| d == "*:*")
        {
            details.push(format!("acls[{i}]: src \"*\" -> dst \"*:*\""));
        }
    }
    for (i, grant) in policy.grants.iter().enumerate() {
        if grant.src.iter().any(|s| is_wildcard(s))
            && grant.dst.iter().any(|d| is_wildcard(d))
            && (grant.ip.is_empty() || grant.ip.iter().any(|p| is_wildcard(p)))
        {
            details.push(format!("grants[{i}]: src \"*\" -> dst \"*\" ip \"*\""));
        }
    }

    offenders(
        details,
        || Evidence::new("No rule allows every source to reach every destination.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} rule(s) allow any device to reach any port on any other device. \
                     A single compromised node can reach the whole tailnet.",
                    d.len()
                ),
                "Replace the allow-all rule with rules scoped to groups, tags and ports.",
            )
            .with_fix(acl_fix("Edit the policy file to remove the allow-all rule"))
        },
    )
}

fn ssh_nonroot_on_tags(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    let details: Vec<String> = policy
        .ssh
        .iter()
        .enumerate()
        .filter(|(_, r)| r.users.iter().any(|u| u == "autogroup:nonroot"))
        .filter(|(_, r)| r.dst.iter().any(|d| d.starts_with("tag:") || d == "*"))
        .map(|(i, r)| format!("ssh[{i}]: autogroup:nonroot on {}", r.dst.join(", ")))
        .collect();

    offenders(
        details,
        || Evidence::new("autogroup:nonroot is not granted on tagged devices.", ""),
        |_| {
            Evidence::new(
                "SSH rules grant autogroup:nonroot on tagged devices. Tagged devices have no \
                 owning user, so this allows login as any non-root local account.",
                "List explicit local usernames for SSH rules that target tags.",
            )
            .with_fix(acl_fix("Replace autogroup:nonroot with explicit users"))
        },
    )
}

fn no_tests(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    if policy.tests.is_empty() && policy.ssh_tests.is_empty() {
        Outcome::Fail(
            Evidence::new(
                "The policy defines no tests or sshTests, so a policy edit that opens \
                 unintended access is accepted without complaint.",
                "Add tests asserting both allowed and denied access for critical resources.",
            )
            .with_fix(
                FixDescriptor::manual("Add a tests section to the policy file")
                    .with_admin_url(admin_url("acls"))
                    .with_doc_url(doc_url("1337/policy-syntax#tests")),
            ),
        )
    } else {
        Outcome::Pass(Evidence::new(
            format!(
                "Policy defines {} test(s) and {} SSH test(s).",
                policy.tests.len(),
                policy.ssh_tests.len()
            ),
            "",
        ))
    }
}

fn member_sources(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    let mut details = Vec::new();
    for (i, rule) in policy.acls.iter().enumerate() {
        if rule.src.iter().any(|s| s == "autogroup:member") {
            details.push(format!("acls[{i}]: -> {}", rule.dst.join(", ")));
        }
    }
    for (i, grant) in policy.grants.iter().enumerate() {
        if grant.src.iter().any(|s| s == "autogroup:member") {
            details.push(format!("grants[{i}]: -> {}", grant.dst.join(", ")));
        }
    }

    offenders(
        details,
        || Evidence::new("No rule uses autogroup:member as a source.", ""),
        |_| {
            Evidence::new(
                "Rules grant access to autogroup:member, which includes invited external \
                 users as well as members of your organisation.",
                "Use autogroup:member only where external invitees should have the same access, \
                 otherwise use groups.",
            )
            .with_fix(acl_fix("Replace autogroup:member with specific groups"))
        },
    )
}

fn auto_approvers(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    let mut details: Vec<String> = policy
        .auto_approvers
        .routes
        .iter()
        .map(|(route, approvers)| format!("route {route}: {}", approvers.join(", ")))
        .collect();
    if !policy.auto_approvers.exit_node.is_empty() {
        details.push(format!(
            "exit node: {}",
            policy.auto_approvers.exit_node.join(", ")
        ));
    }

    offenders(
        details,
        || Evidence::new("No routes or exit nodes are auto-approved.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} auto-approver(s) let devices advertise routes without an administrator \
                     approving them.",
                    d.len()
                ),
                "Limit autoApprovers to tags owned by administrators and to the narrowest routes.",
            )
            .with_fix(
                FixDescriptor::manual("Review autoApprovers in the policy file")
                    .with_admin_url(admin_url("acls"))
                    .with_doc_url(doc_url("1337/policy-syntax#autoapprovers")),
            )
        },
    )
}

fn broad_tag_owners(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    const BROAD: &[&str] = &["*", "autogroup:member", "autogroup:members"];
    let details: Vec<String> = policy
        .tag_owners
        .iter()
        .filter_map(|(tag, owners)| {
            owners
                .iter()
                .find(|o| BROAD.contains(&o.as_str()))
                .map(|o| format!("{tag} owned by {o}"))
        })
        .collect();

    offenders(
        details,
        || Evidence::new("Tag ownership is restricted.", ""),
        |_| {
            Evidence::new(
                "Any user can apply these tags and so inherit every permission granted to them.",
                "Restrict tagOwners to an administrator group or to other tags.",
            )
            .with_fix(acl_fix("Narrow tagOwners entries"))
        },
    )
}

fn danger_all(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    let mut details = Vec::new();
    for (i, rule) in policy.acls.iter().enumerate() {
        if rule.src.iter().chain(rule.dst.iter()).any(|s| s.starts_with("autogroup:danger-all")) {
            details.push(format!("acls[{i}]"));
        }
    }
    for (i, grant) in policy.grants.iter().enumerate() {
        if grant.src.iter().chain(grant.dst.iter()).any(|s| s.starts_with("autogroup:danger-all")) {
            details.push(format!("grants[{i}]"));
        }
    }
    for (i, rule) in policy.ssh.iter().enumerate() {
        if rule.src.iter().any(|s| s == "autogroup:danger-all") {
            details.push(format!("ssh[{i}]"));
        }
    }

    offenders(
        details,
        || Evidence::new("autogroup:danger-all is not used.", ""),
        |_| {
            Evidence::new(
                "autogroup:danger-all matches every identity, including users from other \
                 tailnets with shared devices.",
                "Replace autogroup:danger-all with the groups or tags that need access.",
            )
            .with_fix(acl_fix("Remove autogroup:danger-all"))
        },
    )
}

fn no_groups(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    if policy.groups.is_empty() {
        Outcome::Fail(
            Evidence::new(
                "No groups are defined, so rules name individual users and drift as people \
                 join and leave.",
                "Define groups for teams and roles and reference them in rules.",
            )
            .with_fix(acl_fix("Add a groups section")),
        )
    } else {
        Outcome::Pass(Evidence::new(
            format!("{} group(s) defined.", policy.groups.len()),
            "",
        ))
    }
}

fn legacy_acls(policy: &Policy, _ctx: &CheckContext) -> Outcome {
    if !policy.acls.is_empty() && policy.grants.is_empty() {
        Outcome::Fail(
            Evidence::new(
                format!(
                    "The policy uses {} legacy acls rule(s) and no grants. Grants can express \
                     application capabilities and routing in the same rule.",
                    policy.acls.len()
                ),
                "Consider migrating rules to the grants syntax.",
            )
            .with_fix(
                FixDescriptor::manual("Migrate acls to grants")
                    .with_doc_url(doc_url("1324/grants")),
            ),
        )
    } else {
        Outcome::Pass(Evidence::new("Policy uses grants.", ""))
    }
}

fn taildrop(_policy: &Policy, _ctx: &CheckContext) -> Outcome {
    Outcome::Fail(
        Evidence::new(
            "Taildrop lets devices owned by the same user send files to each other. It is not \
             governed by access rules.",
            "Disable file sharing in the admin console if files must not move between devices.",
        )
        .with_fix(
            FixDescriptor::manual("Review the file sharing setting")
                .with_admin_url(admin_url("settings/features"))
                .with_doc_url(doc_url("1106/taildrop")),
        ),
    )
}
