// Shared test helpers: sample builders, scripted metric sources, fixed disks, recording sink

#![allow(dead_code)]

use nodesnap::disk_repo::DiskInfoSource;
use nodesnap::error::{CollectError, Result};
use nodesnap::export::SnapshotSink;
use nodesnap::extract::{CPU_SECONDS, SENSOR_LABEL, TEMP_CELSIUS};
use nodesnap::models::*;
use nodesnap::source::MetricSource;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

/// `node_cpu_seconds_total` samples for one core.
pub fn cpu_samples(core: &str, modes: &[(&str, f64)]) -> Vec<MetricSample> {
    modes
        .iter()
        .map(|(mode, value)| MetricSample::counter(CPU_SECONDS, &[("cpu", core), ("mode", mode)], *value))
        .collect()
}

pub fn sensor_label(chip: &str, sensor: &str, label: &str) -> MetricSample {
    MetricSample::gauge(
        SENSOR_LABEL,
        &[("chip", chip), ("label", label), ("sensor", sensor)],
        1.0,
    )
}

pub fn temp_reading(chip: &str, sensor: &str, celsius: f64) -> MetricSample {
    MetricSample::gauge(TEMP_CELSIUS, &[("chip", chip), ("sensor", sensor)], celsius)
}

pub fn disk(name: &str) -> DiskInfo {
    DiskInfo {
        name: name.into(),
        mount: "/".into(),
        file_system: "ext4".into(),
        total_space: 1000,
        available_space: 250,
        used_space: 750,
        usage_percent: 75.0,
    }
}

/// Returns scripted results in order; once exhausted, repeats the last one.
/// Records the (tokio) instant of every gather.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<MetricSample>>>>,
    last: Mutex<Option<Vec<MetricSample>>>,
    gathered_at: Mutex<Vec<tokio::time::Instant>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Vec<MetricSample>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            gathered_at: Mutex::new(Vec::new()),
        }
    }

    pub fn gather_times(&self) -> Vec<tokio::time::Instant> {
        self.gathered_at.lock().unwrap().clone()
    }
}

pub fn unavailable() -> CollectError {
    CollectError::SourceUnavailable {
        reason: "scripted failure".into(),
    }
}

impl MetricSource for ScriptedSource {
    fn gather(&self) -> Result<Vec<MetricSample>> {
        self.gathered_at
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(samples)) => {
                *self.last.lock().unwrap() = Some(samples.clone());
                Ok(samples)
            }
            Some(Err(e)) => Err(e),
            None => self.last.lock().unwrap().clone().ok_or_else(unavailable),
        }
    }
}

pub struct FixedDisks(pub Vec<DiskInfo>);

impl DiskInfoSource for FixedDisks {
    fn get_info(&self) -> anyhow::Result<Vec<DiskInfo>> {
        Ok(self.0.clone())
    }
}

pub struct FailingDisks;

impl DiskInfoSource for FailingDisks {
    fn get_info(&self) -> anyhow::Result<Vec<DiskInfo>> {
        anyhow::bail!("no disks")
    }
}

/// Keeps every delivered body; fails when `fail` is set.
#[derive(Default)]
pub struct RecordingSink {
    pub bodies: Mutex<Vec<Vec<u8>>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn delivered(&self) -> Vec<AggregateSnapshot> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .map(|b| serde_json::from_slice(b).unwrap())
            .collect()
    }
}

impl SnapshotSink for RecordingSink {
    fn deliver(&self, body: Vec<u8>) -> impl Future<Output = Result<()>> + Send {
        let result = if self.fail {
            Err(CollectError::Delivery {
                endpoint: "test://sink".into(),
                reason: "refused".into(),
            })
        } else {
            self.bodies.lock().unwrap().push(body);
            Ok(())
        };
        std::future::ready(result)
    }
}
