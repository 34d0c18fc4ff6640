use super::{now_rfc3339, ScanReport};
use crate::config::ProbeConfig;
use crate::engine::{self, BatchOptions, ProbeUnit};
use crate::inputs::expand_cidr;
use crate::probes::dns;
use crate::types::OutcomeOrder;
use anyhow::Result;
use serde::Serialize;
use std::net::IpAddr;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Serialize, Debug, Clone)]
pub struct ReverseDnsFinding {
    pub ip: IpAddr,
    pub hostname: String,
}

/// Reverse-DNS sweep: PTR lookup for every host in the CIDR block, capped at
/// `limit` addresses.
pub async fn run(
    cidr: &str,
    limit: usize,
    config: &ProbeConfig,
    order: OutcomeOrder,
    cancel: CancellationToken,
) -> Result<ScanReport<ReverseDnsFinding>> {
    let ips = expand_cidr(cidr, limit)?;
    info!(cidr, hosts = ips.len(), "starting reverse-DNS sweep");
    let started_at = now_rfc3339();
    let start = Instant::now();

    let resolver = dns::resolver(config.per_unit_timeout);
    let units: Vec<ProbeUnit<IpAddr, String>> = ips
        .iter()
        .map(|&ip| {
            let resolver = resolver.clone();
            ProbeUnit::new(ip, move || dns::reverse_hostname(resolver, ip))
        })
        .collect();

    let opts = BatchOptions::new(config.concurrency, config.per_unit_timeout).with_order(order);
    let batch = engine::run_batch_with_cancel(units, &opts, cancel).await?;

    let findings = batch
        .successes()
        .map(|(&ip, hostname)| ReverseDnsFinding {
            ip,
            hostname: hostname.clone(),
        })
        .collect();

    Ok(ScanReport {
        module: "revdns",
        target: cidr.to_string(),
        started_at,
        elapsed_ms: start.elapsed().as_millis() as u64,
        total_submitted: batch.total_submitted,
        total_succeeded: batch.total_succeeded,
        total_failed: batch.total_failed,
        findings,
    })
}
