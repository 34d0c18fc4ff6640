use super::{now_rfc3339, ScanReport};
use crate::config::ProbeConfig;
use crate::engine::{self, BatchOptions, ProbeUnit};
use crate::probes::http::{self, HttpHit, DIR_HIT_STATUSES};
use crate::types::OutcomeOrder;
use anyhow::Result;
use serde::Serialize;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Fallback wordlist when the caller supplies none.
pub const DEFAULT_WORDLIST: &[&str] = &[
    "admin", "login", "uploads", "config", "backup", "dashboard", "api", "test",
];

#[derive(Serialize, Debug, Clone)]
pub struct DirFinding {
    pub path: String,
    pub url: String,
    pub status: u16,
    pub size: u64,
}

/// Directory brute force: GET `{scheme}://{target}/{word}/` for each word,
/// keeping responses whose status is in the accepted set.
pub async fn run(
    target: &str,
    scheme: &str,
    words: Vec<String>,
    config: &ProbeConfig,
    order: OutcomeOrder,
    cancel: CancellationToken,
) -> Result<ScanReport<DirFinding>> {
    info!(target, words = words.len(), "starting directory brute force");
    let started_at = now_rfc3339();
    let start = Instant::now();

    let client = config.http_client()?;
    let base_url = format!("{scheme}://{target}");
    let units: Vec<ProbeUnit<String, HttpHit>> = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let client = client.clone();
            let url = format!("{base_url}/{word}/");
            let ua = config.user_agent(i).to_string();
            ProbeUnit::new(word.clone(), move || {
                http::get_probe(client, url, ua, DIR_HIT_STATUSES.to_vec(), 0, Vec::new())
            })
        })
        .collect();

    let opts = BatchOptions::new(config.concurrency, config.per_unit_timeout).with_order(order);
    let batch = engine::run_batch_with_cancel(units, &opts, cancel).await?;

    let findings = batch
        .successes()
        .map(|(word, hit)| DirFinding {
            path: word.clone(),
            url: hit.url.clone(),
            status: hit.status,
            size: hit.content_length,
        })
        .collect();

    Ok(ScanReport {
        module: "dirbrute",
        target: target.to_string(),
        started_at,
        elapsed_ms: start.elapsed().as_millis() as u64,
        total_submitted: batch.total_submitted,
        total_succeeded: batch.total_succeeded,
        total_failed: batch.total_failed,
        findings,
    })
}
