// Worker tests: spawn sampling loop against a fixture /proc, stop by limit or shutdown

mod common;

use common::ProcFixture;
use procmeter::models::Dimension;
use procmeter::monitor::Monitor;
use procmeter::worker::{WorkerConfig, WorkerDeps, spawn};
use std::sync::Arc;

#[tokio::test]
async fn worker_stops_after_max_samples() {
    let f = ProcFixture::complete();
    let monitor = Arc::new(Monitor::new(Box::new(f.collector())));
    let (_shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            monitor: monitor.clone(),
            shutdown_rx,
        },
        WorkerConfig {
            sample_interval_ms: 5,
            max_samples: 3,
            stats_log_interval_secs: 3600,
        },
    );
    let samples = handle.await.unwrap();
    assert_eq!(samples, 3);

    let run = monitor.take_run();
    let steps: Vec<u32> = run.points().iter().map(|p| p.step()).collect();
    assert_eq!(steps, vec![0, 1, 2]);
    assert!(
        run.points()
            .iter()
            .all(|p| p.scalar(Dimension::CPU_TIME).map(|s| s.magnitude()) == Some(2900))
    );
}

#[tokio::test]
async fn worker_shutdown_stops_unbounded_sampling() {
    let f = ProcFixture::complete();
    let monitor = Arc::new(Monitor::new(Box::new(f.collector())));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            monitor: monitor.clone(),
            shutdown_rx,
        },
        WorkerConfig {
            sample_interval_ms: 10,
            max_samples: 0,
            stats_log_interval_secs: 3600,
        },
    );
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    let _ = shutdown_tx.send(());
    let samples = handle.await.unwrap();

    assert!(samples >= 1, "worker should have sampled at least once");
    assert_eq!(monitor.len(), samples as usize);
}
