//! End-to-end probe behaviour against mock dependencies.

use std::sync::Arc;
use std::time::{Duration, Instant};

use liveness_probe::health::{
    CheckMode, HealthService, ParallelRunner, Probe, ProbeError, SerialRunner, Status,
};
use liveness_probe::resilience::AbandonPolicy;

mod common;

use common::{mock_probe, Behaviour, Counters};

#[tokio::test]
async fn test_slow_but_in_time_document_store_is_healthy() {
    let (probe, counters) = mock_probe(
        "DocumentStore",
        Behaviour::Healthy,
        Duration::from_millis(500),
        Duration::from_secs(2),
    );

    assert_eq!(probe.check_status().await, Ok(Status::healthy()));
    assert_eq!(counters.closes(), 1);
    assert_eq!(counters.open(), 0);
}

#[tokio::test]
async fn test_key_value_slower_than_timeout() {
    let (probe, counters) = mock_probe(
        "KeyValue",
        Behaviour::Healthy,
        Duration::from_secs(3),
        Duration::from_secs(1),
    );
    let start = Instant::now();

    let err = probe.check_status().await.unwrap_err();

    assert!(start.elapsed() < Duration::from_millis(1050));
    assert!(matches!(err, ProbeError::Timeout { .. }));
    assert_eq!(err.status(), Status::unhealthy("KeyValue - KeyValue Timeout"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(counters.open(), 0, "abandoned session should be released");
}

#[tokio::test]
async fn test_serial_does_not_wait_for_slow_second_probe() {
    let (failing, _) = mock_probe(
        "KeyValue",
        Behaviour::RefuseConnection("connection refused"),
        Duration::ZERO,
        Duration::from_secs(1),
    );
    let (slow, slow_counters) = mock_probe(
        "DocumentStore",
        Behaviour::Healthy,
        Duration::from_secs(2),
        Duration::from_secs(5),
    );
    let start = Instant::now();

    let result = SerialRunner::new().run(&[failing, slow]).await;

    assert_eq!(result, Err(Status::unhealthy("KeyValue - connection refused")));
    assert!(start.elapsed() < Duration::from_millis(500));
    assert_eq!(slow_counters.connects(), 0);
}

#[tokio::test]
async fn test_serial_invokes_prefix_up_to_failure() {
    let mut probes = Vec::new();
    let mut counters = Vec::new();
    for (i, behaviour) in [
        Behaviour::Healthy,
        Behaviour::Healthy,
        Behaviour::FailPing("READONLY"),
        Behaviour::Healthy,
    ]
    .into_iter()
    .enumerate()
    {
        let (probe, c) = mock_probe(&format!("dep{}", i), behaviour, Duration::ZERO, Duration::from_secs(1));
        probes.push(probe);
        counters.push(c);
    }

    let result = SerialRunner::new().run(&probes).await;

    assert_eq!(result, Err(Status::unhealthy("dep2 - READONLY")));
    let connects: Vec<usize> = counters.iter().map(|c| c.connects()).collect();
    assert_eq!(connects, vec![1, 1, 1, 0]);
}

#[tokio::test]
async fn test_parallel_staggered_healthy_probes() {
    let probes: Vec<_> = [100, 200, 300]
        .iter()
        .map(|ms| {
            mock_probe(
                &format!("dep{}", ms),
                Behaviour::Healthy,
                Duration::from_millis(*ms),
                Duration::from_secs(1),
            )
            .0
        })
        .collect();
    let service = HealthService::new(probes, ParallelRunner::default());

    let verdict = service.check(CheckMode::Parallel).await;

    assert!(verdict.is_healthy());
    assert!(verdict.elapsed() >= Duration::from_millis(300));
    assert!(verdict.elapsed() < Duration::from_millis(550), "took {:?}", verdict.elapsed());
    assert!(verdict.body().starts_with("WORKING "));
}

#[tokio::test]
async fn test_parallel_failure_does_not_wait_for_timeouts() {
    let (stuck, _) = mock_probe("Stuck", Behaviour::Healthy, Duration::from_secs(10), Duration::from_secs(5));
    let (broken, _) = mock_probe(
        "Broken",
        Behaviour::RefuseConnection("no route to host"),
        Duration::ZERO,
        Duration::from_secs(5),
    );
    let service = HealthService::new(vec![stuck, broken], ParallelRunner::default());

    let verdict = service.check(CheckMode::Parallel).await;

    assert!(!verdict.is_healthy());
    assert!(verdict.elapsed() < Duration::from_millis(500));
    assert!(verdict.body().starts_with("Broken - no route to host - "));
    assert!(verdict.body().ends_with(" ms"));
}

#[tokio::test]
async fn test_both_runners_agree_when_all_healthy() {
    let pairs: Vec<_> = (0..3)
        .map(|i| mock_probe(&format!("dep{}", i), Behaviour::Healthy, Duration::ZERO, Duration::from_secs(1)))
        .collect();
    let probes: Vec<_> = pairs.iter().map(|(p, _)| p.clone()).collect();

    assert_eq!(SerialRunner::new().run(&probes).await, Ok(()));
    assert_eq!(ParallelRunner::default().run(&probes).await, Ok(()));

    for (_, counters) in &pairs {
        assert_eq!(counters.connects(), 2);
        assert_eq!(counters.closes(), 2);
        assert_eq!(counters.open(), 0);
    }
}

/// A sibling that fails its ping after 100ms and a healthy one still
/// holding its session for `slow_delay`.
fn failing_and_slow(slow_delay: Duration) -> (Vec<Arc<dyn Probe>>, Arc<Counters>) {
    let (failing, _) = mock_probe(
        "KeyValue",
        Behaviour::FailPing("LOADING"),
        Duration::from_millis(100),
        Duration::from_secs(5),
    );
    let (slow, slow_counters) = mock_probe("DocumentStore", Behaviour::Healthy, slow_delay, Duration::from_secs(5));
    (vec![failing, slow], slow_counters)
}

#[tokio::test]
async fn test_parallel_abort_releases_slow_sibling_session() {
    let (probes, slow) = failing_and_slow(Duration::from_secs(2));

    let result = ParallelRunner::new(AbandonPolicy::Abort).run(&probes).await;

    assert_eq!(result, Err(Status::unhealthy("KeyValue - LOADING")));
    assert_eq!(slow.connects(), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(slow.open(), 0, "aborted sibling should drop its session");
    assert_eq!(slow.closes(), 0, "aborted sibling should never reach close");
}

#[tokio::test]
async fn test_parallel_detach_lets_slow_sibling_finish() {
    let (probes, slow) = failing_and_slow(Duration::from_millis(400));

    let result = ParallelRunner::new(AbandonPolicy::Detach).run(&probes).await;

    assert_eq!(result, Err(Status::unhealthy("KeyValue - LOADING")));
    assert_eq!(slow.closes(), 0);
    assert_eq!(slow.open(), 1);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(slow.closes(), 1);
    assert_eq!(slow.open(), 0);
}
