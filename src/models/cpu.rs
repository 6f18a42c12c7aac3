// CPU models: per-core counter snapshots, usage ratios and core temperatures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Usage value emitted when the counter delta cannot produce a ratio.
pub const USAGE_UNAVAILABLE: &str = "unavailable";

/// One (mode, counter value) pair for a core at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreSample {
    pub mode: String,
    pub value: f64,
}

/// Core id -> samples for every mode seen in one capture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreSnapshot {
    cores: BTreeMap<String, Vec<CoreSample>>,
}

impl CoreSnapshot {
    pub fn push(&mut self, core: &str, mode: &str, value: f64) {
        self.cores.entry(core.to_string()).or_default().push(CoreSample {
            mode: mode.to_string(),
            value,
        });
    }

    pub fn get(&self, core: &str) -> Option<&[CoreSample]> {
        self.cores.get(core).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CoreSample])> {
        self.cores
            .iter()
            .map(|(core, samples)| (core.as_str(), samples.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.cores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }
}

/// Derived utilization for one core, formatted with two decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(rename = "cpu")]
    pub id: String,
    pub value: String,
}

/// Core temperature entry. Label-derived entries carry `id`, reading-derived
/// entries carry `value`; merged entries carry both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorAttribute {
    #[serde(rename = "cpu")]
    pub id: String,
    #[serde(rename = "sensor")]
    pub sensor_key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CpuInfo {
    pub usage: Vec<UsageRecord>,
    pub temperature: Vec<SensorAttribute>,
}
