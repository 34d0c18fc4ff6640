use recon_probe_rs::engine::{run_batch, run_batch_with_cancel, BatchError, BatchOptions, ProbeUnit};
use recon_probe_rs::types::{FailureReason, OutcomeOrder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

fn opts(concurrency: usize, timeout_ms: u64) -> BatchOptions {
    BatchOptions::new(concurrency, Duration::from_millis(timeout_ms))
}

#[tokio::test]
async fn every_unit_yields_exactly_one_outcome() {
    let units: Vec<ProbeUnit<usize, usize>> = (0..25)
        .map(|i| ProbeUnit::new(i, move || async move { Ok(i * 2) }))
        .collect();

    let res = run_batch(units, &opts(4, 1_000)).await.unwrap();
    assert_eq!(res.outcomes.len(), 25);
    assert_eq!(res.total_submitted, 25);
    assert_eq!(res.total_succeeded + res.total_failed, res.total_submitted);
    assert_eq!(res.total_succeeded, 25);
}

#[tokio::test]
async fn submission_order_restores_input_order() {
    // Earlier units sleep longer, so completion order is reversed.
    let units: Vec<ProbeUnit<usize, ()>> = (0..8)
        .map(|i| {
            ProbeUnit::new(i, move || async move {
                sleep(Duration::from_millis(80 - (i as u64) * 10)).await;
                Ok(())
            })
        })
        .collect();

    let res = run_batch(units, &opts(8, 2_000)).await.unwrap();
    let identities: Vec<usize> = res.outcomes.iter().map(|o| o.identity).collect();
    assert_eq!(identities, (0..8).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn completion_order_exposes_finish_order() {
    let units: Vec<ProbeUnit<usize, ()>> = vec![
        ProbeUnit::new(0, || async {
            sleep(Duration::from_millis(300)).await;
            Ok(())
        }),
        ProbeUnit::new(1, || async {
            sleep(Duration::from_millis(200)).await;
            Ok(())
        }),
        ProbeUnit::new(2, || async {
            sleep(Duration::from_millis(10)).await;
            Ok(())
        }),
    ];

    let options = opts(3, 1_000).with_order(OutcomeOrder::Completion);
    let res = run_batch(units, &options).await.unwrap();
    let identities: Vec<usize> = res.outcomes.iter().map(|o| o.identity).collect();
    assert_eq!(identities, vec![2, 1, 0]);
}

#[tokio::test]
async fn all_failing_actions_still_complete_the_batch() {
    let units: Vec<ProbeUnit<usize, ()>> = (0..10)
        .map(|i| ProbeUnit::new(i, || async { Err(FailureReason::Unknown) }))
        .collect();

    let res = run_batch(units, &opts(3, 1_000)).await.unwrap();
    assert_eq!(res.total_submitted, 10);
    assert_eq!(res.total_succeeded, 0);
    assert_eq!(res.total_failed, 10);
    assert!(res.outcomes.iter().all(|o| !o.succeeded));
}

#[tokio::test]
async fn live_probe_count_never_exceeds_the_ceiling() {
    const LIMIT: usize = 3;
    let live = Arc::new(AtomicUsize::new(0));
    let max_live = Arc::new(AtomicUsize::new(0));

    let units: Vec<ProbeUnit<usize, ()>> = (0..20)
        .map(|i| {
            let live = live.clone();
            let max_live = max_live.clone();
            ProbeUnit::new(i, move || async move {
                let now = live.fetch_add(1, Ordering::SeqCst) + 1;
                max_live.fetch_max(now, Ordering::SeqCst);
                sleep(Duration::from_millis(20)).await;
                live.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            })
        })
        .collect();

    let res = run_batch(units, &opts(LIMIT, 5_000)).await.unwrap();
    assert_eq!(res.total_succeeded, 20);
    let observed = max_live.load(Ordering::SeqCst);
    assert!(observed <= LIMIT, "observed {observed} concurrent probes");
    assert!(observed >= 1);
}

#[tokio::test]
async fn slow_unit_times_out_without_stalling_the_batch() {
    let units: Vec<ProbeUnit<usize, ()>> = (0..4)
        .map(|i| {
            ProbeUnit::new(i, move || async move {
                if i % 2 == 0 {
                    sleep(Duration::from_secs(30)).await;
                }
                Ok(())
            })
        })
        .collect();

    let start = Instant::now();
    let res = run_batch(units, &opts(4, 100)).await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(5));

    assert_eq!(res.total_succeeded, 2);
    assert_eq!(res.total_failed, 2);
    for o in &res.outcomes {
        if o.identity % 2 == 0 {
            assert_eq!(o.failure_reason, Some(FailureReason::Timeout));
        } else {
            assert!(o.succeeded);
        }
    }
}

#[tokio::test]
async fn port_scan_scenario_matches_expected_totals() {
    let ports: [u16; 10] = [21, 22, 25, 80, 110, 143, 443, 587, 3306, 8080];
    let open: [u16; 3] = [22, 80, 443];

    let units: Vec<ProbeUnit<u16, &'static str>> = ports
        .iter()
        .map(|&port| {
            ProbeUnit::new(port, move || async move {
                if open.contains(&port) {
                    Ok("open")
                } else {
                    Err(FailureReason::ConnectionRefused)
                }
            })
        })
        .collect();

    let res = run_batch(units, &opts(3, 1_000)).await.unwrap();
    assert_eq!(res.total_submitted, 10);
    assert_eq!(res.total_succeeded, 3);
    assert_eq!(res.total_failed, 7);
    assert_eq!(res.outcomes[1].identity, 22);
    assert!(res.outcomes[1].succeeded);
    assert_eq!(
        res.outcomes[0].failure_reason,
        Some(FailureReason::ConnectionRefused)
    );
}

#[tokio::test]
async fn empty_batch_is_rejected_before_any_work() {
    let err = run_batch::<u16, ()>(Vec::new(), &opts(4, 1_000))
        .await
        .unwrap_err();
    assert_eq!(err, BatchError::EmptyBatch);
}

#[tokio::test]
async fn cancellation_fills_remaining_slots() {
    // Two fast units, eight that would hang for a minute. With a ceiling of
    // two, cancellation lands while the slow ones hold the only slots.
    let units: Vec<ProbeUnit<usize, ()>> = (0..10)
        .map(|i| {
            ProbeUnit::new(i, move || async move {
                if i >= 2 {
                    sleep(Duration::from_secs(60)).await;
                }
                Ok(())
            })
        })
        .collect();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let options = opts(2, 30_000);
    let start = Instant::now();
    let res = run_batch_with_cancel(units, &options, cancel).await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(10));

    assert_eq!(res.total_submitted, 10);
    assert_eq!(res.outcomes.len(), 10);
    assert!(res.total_succeeded >= 2);
    let cancelled = res
        .outcomes
        .iter()
        .filter(|o| o.failure_reason == Some(FailureReason::Cancelled))
        .count();
    assert_eq!(cancelled, 10 - res.total_succeeded);
}
