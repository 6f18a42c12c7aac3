use anyhow::Result;
use nodesnap::*;
use std::sync::Arc;
use std::time::Duration;
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

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        endpoint = %app_config.delivery.endpoint,
        interval_secs = app_config.collector.interval_secs,
        "Starting nodesnap"
    );

    let registry = prometheus::Registry::new();
    registry.register(Box::new(node::NodeCollector::new(
        &app_config.collector.procfs_path,
        &app_config.collector.sysfs_path,
    )?))?;
    let source = Arc::new(source::RegistrySource::new(registry));
    let disk_repo = Arc::new(disk_repo::DiskRepo::new());
    let collector = Arc::new(collector::Collector::new(
        source,
        disk_repo,
        Duration::from_millis(app_config.collector.cpu_sample_delay_ms),
    ));
    let sink = Arc::new(export::HttpSink::new(&app_config.delivery)?);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            collector,
            sink,
            shutdown_rx,
        },
        worker::WorkerConfig {
            interval: Duration::from_secs(app_config.collector.interval_secs),
            stats_log_interval: Duration::from_secs(app_config.collector.stats_log_interval_secs),
        },
    );

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    let stats = worker_handle.await?;
    tracing::info!(
        cycles = stats.cycles,
        exports_ok = stats.exports_ok,
        exports_failed = stats.exports_failed,
        "Worker stopped"
    );
    Ok(())
}
