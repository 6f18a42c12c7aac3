// One collection cycle: two time-separated captures, per-section extraction, assembly.

use crate::assembler::assemble;
use crate::disk_repo::DiskInfoSource;
use crate::error::{CollectError, Result};
use crate::extract::{
    apply_network, capture_core_snapshot, compute_usage, extract_memory, extract_sensor_labels,
    extract_sensor_readings, merge_temperature,
};
use crate::models::{
    AggregateSnapshot, DiskInfo, MemoryRecord, MetricSample, NetworkMap, SensorAttribute,
    UsageRecord,
};
use crate::source::MetricSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Sections carried between cycles. A section whose extraction fails keeps its
/// previous value; the network map is merged, the others are replaced.
/// Owned by the caller, one writer at a time.
#[derive(Debug, Clone, Default)]
pub struct ReportState {
    pub usage: Vec<UsageRecord>,
    pub temperature: Vec<SensorAttribute>,
    pub memory: MemoryRecord,
    pub network: NetworkMap,
    pub disks: Vec<DiskInfo>,
}

impl ReportState {
    pub fn snapshot(&self) -> AggregateSnapshot {
        assemble(
            self.memory,
            self.usage.clone(),
            self.temperature.clone(),
            self.network.clone(),
            self.disks.clone(),
        )
    }
}

pub struct Collector {
    source: Arc<dyn MetricSource>,
    disks: Arc<dyn DiskInfoSource>,
    cpu_sample_delay: Duration,
}

impl Collector {
    pub fn new(
        source: Arc<dyn MetricSource>,
        disks: Arc<dyn DiskInfoSource>,
        cpu_sample_delay: Duration,
    ) -> Self {
        Self {
            source,
            disks,
            cpu_sample_delay,
        }
    }

    async fn gather(&self) -> Result<Vec<MetricSample>> {
        let source = self.source.clone();
        tokio::task::spawn_blocking(move || source.gather())
            .await
            .map_err(|e| CollectError::SourceUnavailable {
                reason: format!("gather task join: {}", e),
            })?
    }

    /// "Previous" capture now, "last" capture after the configured delay. Both run
    /// concurrently and each returns its own sample set.
    #[instrument(skip(self), fields(operation = "capture_pair", delay_ms = self.cpu_sample_delay.as_millis() as u64))]
    pub async fn capture_pair(&self) -> (Result<Vec<MetricSample>>, Result<Vec<MetricSample>>) {
        let previous = self.gather();
        let last = async {
            tokio::time::sleep(self.cpu_sample_delay).await;
            self.gather().await
        };
        tokio::join!(previous, last)
    }

    async fn disk_info(&self) -> anyhow::Result<Vec<DiskInfo>> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || disks.get_info())
            .await
            .map_err(|e| anyhow::anyhow!("disk info task join: {}", e))?
    }

    /// Run one cycle against `state` and return the assembled snapshot.
    /// Never fails as a whole; failed sections are logged and left as they were.
    #[instrument(skip(self, state), fields(operation = "run_cycle"))]
    pub async fn run_cycle(&self, state: &mut ReportState) -> AggregateSnapshot {
        let (previous, last) = self.capture_pair().await;

        let previous_cores = match previous {
            Ok(samples) => Some(capture_core_snapshot(&samples)),
            Err(e) => {
                tracing::warn!(error = %e, operation = "capture_previous", "previous capture failed");
                None
            }
        };

        match last {
            Ok(samples) => {
                let last_cores = capture_core_snapshot(&samples);
                if let Some(previous_cores) = previous_cores {
                    state.usage = compute_usage(&previous_cores, &last_cores);
                }
                state.temperature = merge_temperature(
                    extract_sensor_labels(&samples),
                    &extract_sensor_readings(&samples),
                );
                apply_network(&mut state.network, &samples);
                state.memory = extract_memory(&samples);
                tracing::debug!(
                    cores = last_cores.len(),
                    sensors = state.temperature.len(),
                    devices = state.network.len(),
                    "sections extracted"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, operation = "capture_last", "last capture failed");
            }
        }

        match self.disk_info().await {
            Ok(disks) => state.disks = disks,
            Err(e) => {
                tracing::warn!(error = %e, operation = "get_disk_info", "disk info failed");
            }
        }

        state.snapshot()
    }
}
