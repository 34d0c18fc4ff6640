//! Enumeration modules. Each one builds a unit list, runs a single batch
//! through the probe engine, and interprets payloads into typed findings.
pub mod banner_grab;
pub mod dir_brute;
pub mod port_scan;
pub mod reverse_dns;
pub mod subdomain_brute;
pub mod vuln_paths;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::net::IpAddr;
use time::{format_description::well_known, OffsetDateTime};

/// Envelope written around every module's findings.
#[derive(Serialize, Debug, Clone)]
pub struct ScanReport<T> {
    pub module: &'static str,
    pub target: String,
    pub started_at: String,
    pub elapsed_ms: u64,
    pub total_submitted: usize,
    pub total_succeeded: usize,
    pub total_failed: usize,
    pub findings: Vec<T>,
}

/// Static registry entry: stable identifier plus a one-line summary.
/// Dispatch itself is typed (CLI subcommands), resolved at compile time.
pub struct ModuleInfo {
    pub id: &'static str,
    pub summary: &'static str,
}

pub const REGISTRY: &[ModuleInfo] = &[
    ModuleInfo {
        id: "portscan",
        summary: "TCP connect scan over a port list",
    },
    ModuleInfo {
        id: "banner",
        summary: "Banner grab on common service ports",
    },
    ModuleInfo {
        id: "dirbrute",
        summary: "Directory brute force from a wordlist",
    },
    ModuleInfo {
        id: "vulnscan",
        summary: "Probe well-known sensitive paths",
    },
    ModuleInfo {
        id: "subenum",
        summary: "Subdomain brute force via DNS resolution",
    },
    ModuleInfo {
        id: "revdns",
        summary: "Reverse-DNS sweep over a CIDR block",
    },
];

/// RFC3339 UTC timestamp for report headers.
pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

/// Resolve a hostname (or parse a literal address) to one IP for socket
/// probes. Resolution failure here is a setup error, not a probe outcome.
pub(crate) async fn resolve_host(host: &str) -> Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    let mut addrs = tokio::net::lookup_host((host, 0u16))
        .await
        .with_context(|| format!("failed to resolve target: {host}"))?;
    match addrs.next() {
        Some(sa) => Ok(sa.ip()),
        None => bail!("no addresses found for target: {host}"),
    }
}
