// Background collection worker: one cycle per tick, export, keep going on failure.

use crate::collector::{Collector, ReportState};
use crate::export::{SnapshotSink, export};
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Collector, sink and shutdown for the worker.
pub struct WorkerDeps<S> {
    pub collector: Arc<Collector>,
    pub sink: Arc<S>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing config.
pub struct WorkerConfig {
    /// Time between cycle starts.
    pub interval: Duration,
    /// How often to log cycle/export counters.
    pub stats_log_interval: Duration,
}

/// Per-worker counters, logged on the stats interval.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub cycles: u64,
    pub exports_ok: u64,
    pub exports_failed: u64,
}

/// Spawns the worker. Returns its final counters once shutdown is received.
/// A cycle in flight runs to completion first, so shutdown can wait up to the
/// CPU sample delay plus the delivery timeout.
pub fn spawn<S>(deps: WorkerDeps<S>, config: WorkerConfig) -> tokio::task::JoinHandle<WorkerStats>
where
    S: SnapshotSink + 'static,
{
    let WorkerDeps {
        collector,
        sink,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        interval: cycle_interval,
        stats_log_interval,
    } = config;

    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        interval_ms = cycle_interval.as_millis() as u64
    );

    tokio::spawn(
        async move {
            let mut tick = interval(cycle_interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(stats_log_interval);
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            let mut state = ReportState::default();
            let mut stats = WorkerStats::default();

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let snapshot = collector.run_cycle(&mut state).await;
                        stats.cycles += 1;
                        match export(sink.as_ref(), &snapshot).await {
                            Ok(()) => {
                                stats.exports_ok += 1;
                                tracing::debug!(operation = "export", cycle = stats.cycles, "snapshot exported");
                            }
                            Err(e) => {
                                stats.exports_failed += 1;
                                tracing::warn!(
                                    error = %e,
                                    operation = "export",
                                    cycle = stats.cycles,
                                    "snapshot export failed"
                                );
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            cycles = stats.cycles,
                            exports_ok = stats.exports_ok,
                            exports_failed = stats.exports_failed,
                            "collector stats"
                        );
                    }
                }
            }
            stats
        }
        .instrument(worker_span),
    )
}
