//! DNS configuration checks

use super::{admin_url, doc_url, offenders, CategoryAuditor, CheckContext, CheckDef, Evidence, Outcome};
use crate::domain::entities::FixDescriptor;
use crate::domain::tailnet::DnsConfig;
use crate::domain::value_objects::{Category, Severity};

pub struct DnsAuditor;

impl CategoryAuditor for DnsAuditor {
    type Input = DnsConfig;

    fn category(&self) -> Category {
        Category::DnsConfiguration
    }

    fn checks(&self) -> &'static [CheckDef<DnsConfig>] {
        CHECKS
    }
}

const CHECKS: &[CheckDef<DnsConfig>] = &[
    CheckDef { id: "DNS-001", severity: Severity::Low, run: magic_dns },
    CheckDef { id: "DNS-002", severity: Severity::Low, run: search_domains },
    CheckDef { id: "DNS-003", severity: Severity::Medium, run: public_resolvers },
];

fn dns_fix(description: &str, doc: &str) -> FixDescriptor {
    FixDescriptor::manual(description)
        .with_admin_url(admin_url("dns"))
        .with_doc_url(doc_url(doc))
}

fn magic_dns(dns: &DnsConfig, _ctx: &CheckContext) -> Outcome {
    if dns.magic_dns {
        return Outcome::Pass(Evidence::new("MagicDNS is enabled.", ""));
    }
    Outcome::Fail(
        Evidence::new(
            "MagicDNS is off. Devices are addressed by IP, which makes policy review and \
             incident response harder.",
            "Enable MagicDNS.",
        )
        .with_fix(dns_fix("Enable MagicDNS", "1081/magicdns")),
    )
}

// The remaining checks describe what MagicDNS pushes to clients and say
// nothing while it is off.

fn search_domains(dns: &DnsConfig, _ctx: &CheckContext) -> Outcome {
    if !dns.magic_dns {
        return Outcome::Omitted;
    }
    offenders(
        dns.search_paths.clone(),
        || Evidence::new("No extra search domains are pushed to devices.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} search domain(s) are pushed to every device. Short names typed on any \
                     device resolve against them.",
                    d.len()
                ),
                "Keep only search domains every device needs.",
            )
            .with_fix(dns_fix("Review search domains", "1054/dns"))
        },
    )
}

fn public_resolvers(dns: &DnsConfig, _ctx: &CheckContext) -> Outcome {
    if !dns.magic_dns {
        return Outcome::Omitted;
    }
    let details = dns.public_nameservers().map(str::to_string).collect();
    offenders(
        details,
        || Evidence::new("No global nameservers are public resolvers.", ""),
        |d| {
            Evidence::new(
                format!(
                    "{} public resolver(s) receive every DNS query from tailnet devices, \
                     leaking internal hostnames to a third party.",
                    d.len()
                ),
                "Use resolvers you operate, or split DNS for internal domains.",
            )
            .with_fix(dns_fix("Replace public nameservers", "1054/dns"))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::test_support::{check, run};

    fn dns(magic: bool, nameservers: &[&str], search: &[&str]) -> DnsConfig {
        DnsConfig {
            magic_dns: magic,
            nameservers: nameservers.iter().map(|s| s.to_string()).collect(),
            search_paths: search.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn magic_dns_off_only_reports_dns_001() {
        let findings = run(&DnsAuditor, &dns(false, &["8.8.8.8"], &["corp.example"]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id(), "DNS-001");
        assert!(!findings[0].is_pass());
    }

    #[test]
    fn private_resolvers_pass() {
        let findings = run(&DnsAuditor, &dns(true, &["10.0.0.53"], &[]));
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|s| s.is_pass()));
    }

    #[test]
    fn public_resolvers_and_search_paths_fail() {
        let input = dns(true, &["1.1.1.1", "10.0.0.53"], &["corp.example"]);
        assert_eq!(check(&DnsAuditor, &input, "DNS-003").unwrap().details(), ["1.1.1.1"]);
        assert_eq!(check(&DnsAuditor, &input, "DNS-002").unwrap().details(), ["corp.example"]);
    }
}
