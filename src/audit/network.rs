//! Network exposure checks

use super::{admin_url, doc_url, offenders, CategoryAuditor, CheckContext, CheckDef, Evidence, Outcome};
use crate::domain::entities::FixDescriptor;
use crate::domain::tailnet::{Device, Policy};
use crate::domain::value_objects::{Category, Severity};

/// Policy plus the device list, for checks that look at advertised routes.
/// `devices` is `None` when the device fetch failed; route checks are then
/// omitted.
#[derive(Debug, Clone, Default)]
pub struct NetworkInput {
    pub policy: Policy,
    pub devices: Option<Vec<Device>>,
}

pub struct NetworkAuditor;

impl CategoryAuditor for NetworkAuditor {
    type Input = NetworkInput;

    fn category(&self) -> Category {
        Category::NetworkExposure
    }

    fn checks(&self) -> &'static [CheckDef<NetworkInput>] {
        CHECKS
    }
}

const CHECKS: &[CheckDef<NetworkInput>] = &[
    CheckDef { id: "NET-001", severity: Severity::High, run: funnel_enabled },
    CheckDef { id: "NET-002", severity: Severity::Medium, run: exit_node_access },
    CheckDef { id: "NET-003", severity: Severity::Medium, run: subnet_routes },
    CheckDef { id: "NET-004", severity: Severity::Info, run: https_certificates },
    CheckDef { id: "NET-005", severity: Severity::Medium, run: exit_nodes },
    CheckDef { id: "NET-006", severity: Severity::Info, run: serve_advisory },
    CheckDef { id: "NET-007", severity: Severity::Medium, run: app_connectors },
];

fn acl_fix(description: &str, doc: &str) -> FixDescriptor {
    FixDescriptor::manual(description)
        .with_admin_url(admin_url("acls/file"))
        .with_doc_url(doc_url(doc))
}

fn funnel_enabled(input: &NetworkInput, _ctx: &CheckContext) -> Outcome {
    let details = input
        .policy
        .node_attrs_with("funnel")
        .map(|n| format!("funnel granted to {}", n.target.join(", ")))
        .collect();

    offenders(
        details,
        || Evidence::new("No node attributes enable Funnel.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} node attribute(s) allow Funnel, which publishes local services to \
                     the public internet.",
                    d.len()
                ),
                "Limit the funnel attribute to the specific tags that must serve public traffic.",
            )
            .with_fix(acl_fix("Restrict the funnel node attribute", "1223/funnel"))
        },
    )
}

fn is_broad_source(src: &str) -> bool {
    src == "*" || src.starts_with("autogroup:member")
}

fn exit_node_access(input: &NetworkInput, _ctx: &CheckContext) -> Outcome {
    let policy = &input.policy;
    let to_internet = |dst: &[String]| dst.iter().any(|d| d.starts_with("autogroup:internet"));
    let rules: Vec<(&str, &[String])> = policy
        .acls
        .iter()
        .filter(|r| to_internet(&r.dst))
        .map(|r| ("acl", r.src.as_slice()))
        .chain(
            policy
                .grants
                .iter()
                .filter(|g| to_internet(&g.dst))
                .map(|g| ("grant", g.src.as_slice())),
        )
        .collect();
    let broad = rules
        .iter()
        .any(|(_, src)| src.iter().any(|s| is_broad_source(s)));
    let details = rules
        .iter()
        .map(|(kind, src)| format!("{kind}: {} -> autogroup:internet", src.join(", ")))
        .collect();

    offenders(
        details,
        || Evidence::new("No rules grant exit node use.", ""),
        |d| {
            let evidence = Evidence::new(
                format!(
                    "{} rule(s) let sources route internet traffic through exit nodes.",
                    d.len()
                ),
                "Grant autogroup:internet only to the groups that need exit nodes.",
            )
            .with_fix(acl_fix("Narrow autogroup:internet rules", "1103/exit-nodes"));
            if broad {
                evidence.with_severity(Severity::High)
            } else {
                evidence
            }
        },
    )
}

fn subnet_routes(input: &NetworkInput, _ctx: &CheckContext) -> Outcome {
    let Some(devices) = &input.devices else {
        return Outcome::Omitted;
    };
    let details = devices
        .iter()
        .filter_map(|d| {
            let routes: Vec<&str> = d.subnet_routes().collect();
            (!routes.is_empty()).then(|| format!("{}: {}", d.label(), routes.join(", ")))
        })
        .collect();

    offenders(
        details,
        || Evidence::new("No devices advertise subnet routes.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} subnet router(s) extend the tailnet into physical networks. Devices \
                     behind them are reachable without running Tailscale themselves.",
                    d.len()
                ),
                "Confirm each route is intended and restrict access to it in the policy file.",
            )
            .with_fix(
                FixDescriptor::manual("Review subnet routes")
                    .with_admin_url(admin_url("machines"))
                    .with_doc_url(doc_url("1019/subnets")),
            )
        },
    )
}

fn https_certificates(_input: &NetworkInput, _ctx: &CheckContext) -> Outcome {
    Outcome::Fail(
        Evidence::new(
            "When HTTPS certificates are enabled every machine name that requests one is \
             published in public certificate transparency logs.",
            "Keep HTTPS off unless needed and give machines neutral names.",
        )
        .with_fix(
            FixDescriptor::manual("Review HTTPS certificate usage")
                .with_admin_url(admin_url("dns"))
                .with_doc_url(doc_url("1153/enabling-https")),
        ),
    )
}

fn exit_nodes(input: &NetworkInput, _ctx: &CheckContext) -> Outcome {
    let Some(devices) = &input.devices else {
        return Outcome::Omitted;
    };
    let details = devices
        .iter()
        .filter(|d| d.advertises_exit_node())
        .map(|d| d.label().to_string())
        .collect();

    offenders(
        details,
        || Evidence::new("No devices advertise themselves as exit nodes.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} exit node(s) can observe all internet traffic routed through them.",
                    d.len()
                ),
                "Run exit nodes only on hardened, monitored machines.",
            )
            .with_fix(
                FixDescriptor::manual("Review exit nodes")
                    .with_admin_url(admin_url("machines"))
                    .with_doc_url(doc_url("1103/exit-nodes")),
            )
        },
    )
}

fn serve_advisory(_input: &NetworkInput, _ctx: &CheckContext) -> Outcome {
    Outcome::Fail(
        Evidence::new(
            "Tailscale Serve shares local services with the tailnet. Served ports are only \
             governed by access rules, not by host firewalls.",
            "Audit which devices run `tailscale serve` and restrict access to them.",
        )
        .with_fix(
            FixDescriptor::manual("Review Serve usage").with_doc_url(doc_url("1312/serve")),
        ),
    )
}

fn app_connectors(input: &NetworkInput, _ctx: &CheckContext) -> Outcome {
    let connectors = input.policy.app_connectors();
    if connectors.is_empty() {
        return Outcome::Omitted;
    }

    let wildcard: Vec<String> = connectors
        .iter()
        .flat_map(|c| {
            c.domains
                .iter()
                .filter(|d| d.starts_with('*'))
                .map(move |d| format!("{}: {d}", c.name))
        })
        .collect();

    if wildcard.is_empty() {
        let details = connectors
            .iter()
            .map(|c| format!("{}: {}", c.name, c.domains.join(", ")))
            .collect();
        return Outcome::Pass(
            Evidence::new(
                format!("{} app connector(s) route named domains only.", connectors.len()),
                "",
            )
            .with_details(details),
        );
    }

    Outcome::Fail(
        Evidence::new(
            "App connectors with wildcard domains send traffic for every matching \
             subdomain through the connector.",
            "Replace wildcard domains with the specific hostnames the app needs.",
        )
        .with_details(wildcard)
        .with_fix(acl_fix("Narrow app connector domains", "1281/app-connectors")),
    )
}
