// Background sampling worker: one data point per tick until the sample limit or shutdown.

use crate::monitor::Monitor;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Monitor and shutdown for the worker.
pub struct WorkerDeps {
    pub monitor: Arc<Monitor>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and logging config.
pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// 0 means unbounded.
    pub max_samples: u32,
    /// How often to log run stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Spawns the sampling loop. Resolves to the number of data points taken.
/// Step numbers start at 0 and increase by one per sample.
pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<u32> {
    let WorkerDeps {
        monitor,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        max_samples,
        stats_log_interval_secs,
    } = config;

    let stats_log_interval = Duration::from_secs(stats_log_interval_secs);

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", sample_interval_ms);

    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_millis(sample_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(stats_log_interval);
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            let mut step: u32 = 0;
            let mut last_dimensions: usize = 0;

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let m = monitor.clone();
                        let current = step;
                        match tokio::task::spawn_blocking(move || m.sample(current)).await {
                            Ok(point) => {
                                last_dimensions = point.len();
                                step += 1;
                            }
                            Err(e) => {
                                tracing::warn!(
                                    error = %e,
                                    operation = "sample",
                                    "sampling task failed"
                                );
                                continue;
                            }
                        }
                        if max_samples > 0 && step >= max_samples {
                            tracing::debug!(samples = step, "Sample limit reached");
                            break;
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            collector = monitor.collector_name(),
                            samples_taken = step,
                            points_buffered = monitor.len(),
                            last_dimensions,
                            "run stats"
                        );
                    }
                }
            }
            step
        }
        .instrument(worker_span),
    )
}
