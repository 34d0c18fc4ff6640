use super::{now_rfc3339, resolve_host, ScanReport};
use crate::config::ProbeConfig;
use crate::engine::{self, BatchOptions, ProbeUnit};
use crate::ports::well_known_service;
use crate::probes::tcp::{self, TcpHit};
use crate::types::OutcomeOrder;
use anyhow::Result;
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Serialize, Debug, Clone)]
pub struct BannerFinding {
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

/// Banner grab: connect to each port and solicit a banner, sending an HTTP
/// stimulus on web ports that stay silent otherwise.
pub async fn run(
    target: &str,
    ports: Vec<u16>,
    config: &ProbeConfig,
    order: OutcomeOrder,
    cancel: CancellationToken,
) -> Result<ScanReport<BannerFinding>> {
    let ip = resolve_host(target).await?;
    info!(%ip, ports = ports.len(), "starting banner grab");
    let started_at = now_rfc3339();
    let start = Instant::now();

    let window = config.banner_read_timeout;
    let host = target.to_string();
    let units: Vec<ProbeUnit<u16, TcpHit>> = ports
        .iter()
        .map(|&port| {
            let host = host.clone();
            ProbeUnit::new(port, move || async move {
                tcp::banner_probe(SocketAddr::new(ip, port), &host, window).await
            })
        })
        .collect();

    let opts = BatchOptions::new(config.concurrency, config.per_unit_timeout).with_order(order);
    let batch = engine::run_batch_with_cancel(units, &opts, cancel).await?;

    let findings = batch
        .successes()
        .map(|(&port, hit)| BannerFinding {
            port,
            service: well_known_service(port),
            banner: hit.banner.clone(),
        })
        .collect();

    Ok(ScanReport {
        module: "banner",
        target: target.to_string(),
        started_at,
        elapsed_ms: start.elapsed().as_millis() as u64,
        total_submitted: batch.total_submitted,
        total_succeeded: batch.total_succeeded,
        total_failed: batch.total_failed,
        findings,
    })
}
