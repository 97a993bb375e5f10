use anyhow::Result;
use procmeter::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!("{} starting", version::banner());

    let monitor = Arc::new(monitor::Monitor::new(collector::platform_collector(
        &app_config.collector,
    )));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let mut worker_handle = worker::spawn(
        worker::WorkerDeps {
            monitor: monitor.clone(),
            shutdown_rx,
        },
        worker::WorkerConfig {
            sample_interval_ms: app_config.monitoring.sample_interval_ms,
            max_samples: app_config.monitoring.max_samples,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let samples = tokio::select! {
        result = &mut worker_handle => result?,
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            (&mut worker_handle).await?
        }
    };

    let run = monitor.take_run();
    tracing::info!(samples, points = run.len(), "sampling finished");
    for line in report::render_summary(&run).lines() {
        tracing::info!("{}", line);
    }

    if let Some(path) = &app_config.output.path {
        report::write_json(std::path::Path::new(path), &run)?;
        tracing::info!(path = %path, "Run written");
    }

    Ok(())
}
