use crate::types::{BatchResult, FailureReason, OutcomeOrder, ProbeOutcome};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Boxed future produced by a probe action.
pub type ProbeFuture<P> = Pin<Box<dyn Future<Output = Result<P, FailureReason>> + Send>>;

/// One independent unit of work: an opaque identity (port number, URL path,
/// subdomain label, IP address) plus the async action that probes it.
///
/// The action owns everything it needs; no two units share mutable state, so
/// one unit's failure can never affect another.
pub struct ProbeUnit<I, P> {
    identity: I,
    action: Box<dyn FnOnce() -> ProbeFuture<P> + Send>,
}

impl<I, P> ProbeUnit<I, P> {
    pub fn new<F, Fut>(identity: I, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<P, FailureReason>> + Send + 'static,
    {
        Self {
            identity,
            action: Box::new(move || Box::pin(action()) as ProbeFuture<P>),
        }
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }
}

/// Per-batch knobs. The per-unit timeout is enforced by the engine around
/// each action; actions themselves should not apply an overall deadline.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub concurrency: usize,
    pub per_unit_timeout: Duration,
    pub order: OutcomeOrder,
}

impl BatchOptions {
    pub fn new(concurrency: usize, per_unit_timeout: Duration) -> Self {
        Self {
            concurrency,
            per_unit_timeout,
            order: OutcomeOrder::Submission,
        }
    }

    pub fn with_order(mut self, order: OutcomeOrder) -> Self {
        self.order = order;
        self
    }
}

/// Configuration errors, detected before any probe starts. Distinct from
/// per-unit probe failures, which are always captured inside the outcomes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("no probe units were submitted")]
    EmptyBatch,
    #[error("concurrency limit must be at least 1 (got {0})")]
    InvalidConcurrency(usize),
    #[error("per-unit timeout must be greater than zero")]
    ZeroTimeout,
}

/// Run a batch of probe units under a concurrency ceiling.
///
/// - A `Semaphore` caps in-flight units; as soon as one finishes, the next
///   queued unit launches (work-queue, not batch-of-batches).
/// - Each action runs under `tokio::time::timeout`; expiry yields a
///   `timeout` outcome without disturbing other units.
/// - Action errors are converted to outcomes at the unit boundary; the batch
///   itself never aborts because one unit failed.
pub async fn run_batch<I, P>(
    units: Vec<ProbeUnit<I, P>>,
    options: &BatchOptions,
) -> Result<BatchResult<I, P>, BatchError>
where
    I: Clone + Send + 'static,
    P: Send + 'static,
{
    run_batch_with_cancel(units, options, CancellationToken::new()).await
}

/// Variant that accepts a `CancellationToken` for external cancellation.
///
/// Cancellation stops launching queued units immediately and aborts in-flight
/// ones; every submitted unit still yields an outcome, with unfinished units
/// marked `cancelled`.
pub async fn run_batch_with_cancel<I, P>(
    units: Vec<ProbeUnit<I, P>>,
    options: &BatchOptions,
    cancel: CancellationToken,
) -> Result<BatchResult<I, P>, BatchError>
where
    I: Clone + Send + 'static,
    P: Send + 'static,
{
    if units.is_empty() {
        return Err(BatchError::EmptyBatch);
    }
    if options.concurrency < 1 {
        return Err(BatchError::InvalidConcurrency(options.concurrency));
    }
    if options.per_unit_timeout.is_zero() {
        return Err(BatchError::ZeroTimeout);
    }

    let total = units.len();
    let timeout = options.per_unit_timeout;
    let effective = options.concurrency.min(total);
    debug!(total, concurrency = effective, "starting probe batch");

    // Identities are kept aside so units that never launch (cancellation,
    // or a panicked action) still get an outcome slot filled at the end.
    let identities: Vec<I> = units.iter().map(|u| u.identity.clone()).collect();
    let mut launched = vec![false; total];

    let sem = Arc::new(Semaphore::new(effective));
    let mut set: JoinSet<(usize, ProbeOutcome<I, P>)> = JoinSet::new();

    for (idx, unit) in units.into_iter().enumerate() {
        // Waiting on a permit must not outlive a cancellation request.
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            permit = Arc::clone(&sem).acquire_owned() => match permit {
                Ok(p) => p,
                Err(_) => break,
            },
        };

        launched[idx] = true;
        let cancel = cancel.clone();
        let ProbeUnit { identity, action } = unit;

        set.spawn(async move {
            let _permit = permit; // held until the unit completes

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    ProbeOutcome::failure(identity, FailureReason::Cancelled)
                }
                res = time::timeout(timeout, action()) => match res {
                    Ok(Ok(payload)) => ProbeOutcome::success(identity, payload),
                    Ok(Err(reason)) => ProbeOutcome::failure(identity, reason),
                    Err(_) => ProbeOutcome::failure(identity, FailureReason::Timeout),
                },
            };
            (idx, outcome)
        });
    }

    // Join order is completion order.
    let mut completed: Vec<(usize, ProbeOutcome<I, P>)> = Vec::with_capacity(total);
    while let Some(joined) = set.join_next().await {
        if let Ok(pair) = joined {
            completed.push(pair);
        }
        // A join error means the action panicked; its slot is filled below.
    }

    let mut present = vec![false; total];
    for (idx, _) in &completed {
        present[*idx] = true;
    }
    for idx in 0..total {
        if !present[idx] {
            let reason = if launched[idx] {
                FailureReason::Unknown
            } else {
                FailureReason::Cancelled
            };
            completed.push((idx, ProbeOutcome::failure(identities[idx].clone(), reason)));
        }
    }

    if options.order == OutcomeOrder::Submission {
        completed.sort_by_key(|(idx, _)| *idx);
    }

    let outcomes: Vec<ProbeOutcome<I, P>> = completed.into_iter().map(|(_, o)| o).collect();
    let total_succeeded = outcomes.iter().filter(|o| o.succeeded).count();
    let total_failed = total - total_succeeded;
    debug!(total_succeeded, total_failed, "probe batch complete");

    Ok(BatchResult {
        total_submitted: total,
        total_succeeded,
        total_failed,
        outcomes,
    })
}
