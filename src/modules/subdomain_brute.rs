use super::{now_rfc3339, ScanReport};
use crate::config::ProbeConfig;
use crate::engine::{self, BatchOptions, ProbeUnit};
use crate::probes::dns;
use crate::types::OutcomeOrder;
use anyhow::Result;
use serde::Serialize;
use std::net::IpAddr;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Fallback label list when the caller supplies no wordlist.
pub const DEFAULT_LABELS: &[&str] = &[
    "www", "mail", "ftp", "webmail", "admin", "api", "dev", "staging", "test", "vpn", "ns1", "ns2",
    "blog", "shop", "portal", "m",
];

#[derive(Serialize, Debug, Clone)]
pub struct SubdomainFinding {
    pub subdomain: String,
    pub ips: Vec<IpAddr>,
}

/// Subdomain brute force: resolve `{label}.{domain}` for each wordlist label.
pub async fn run(
    domain: &str,
    labels: Vec<String>,
    config: &ProbeConfig,
    order: OutcomeOrder,
    cancel: CancellationToken,
) -> Result<ScanReport<SubdomainFinding>> {
    info!(domain, labels = labels.len(), "starting subdomain brute force");
    let started_at = now_rfc3339();
    let start = Instant::now();

    let resolver = dns::resolver(config.per_unit_timeout);
    let units: Vec<ProbeUnit<String, Vec<IpAddr>>> = labels
        .iter()
        .map(|label| {
            let fqdn = format!("{label}.{domain}");
            let resolver = resolver.clone();
            let name = fqdn.clone();
            ProbeUnit::new(fqdn, move || dns::lookup_ips(resolver, name))
        })
        .collect();

    let opts = BatchOptions::new(config.concurrency, config.per_unit_timeout).with_order(order);
    let batch = engine::run_batch_with_cancel(units, &opts, cancel).await?;

    let findings = batch
        .successes()
        .map(|(fqdn, ips)| SubdomainFinding {
            subdomain: fqdn.clone(),
            ips: ips.clone(),
        })
        .collect();

    Ok(ScanReport {
        module: "subenum",
        target: domain.to_string(),
        started_at,
        elapsed_ms: start.elapsed().as_millis() as u64,
        total_submitted: batch.total_submitted,
        total_succeeded: batch.total_succeeded,
        total_failed: batch.total_failed,
        findings,
    })
}
