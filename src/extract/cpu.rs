// CPU delta engine: per-core counter snapshots and usage ratios between two captures.

use crate::error::{CollectError, Result};
use crate::models::{CoreSample, CoreSnapshot, MetricSample, USAGE_UNAVAILABLE, UsageRecord};

pub const CPU_SECONDS: &str = "node_cpu_seconds_total";
pub const IDLE_MODE: &str = "idle";

/// Collect every `node_cpu_seconds_total` sample into a fresh snapshot keyed by the `cpu` label.
pub fn capture_core_snapshot(samples: &[MetricSample]) -> CoreSnapshot {
    let mut snapshot = CoreSnapshot::default();
    for sample in samples.iter().filter(|s| s.name == CPU_SECONDS) {
        let Some(value) = sample.value() else {
            continue;
        };
        let core = sample.label("cpu").unwrap_or_default();
        let mode = sample.label("mode").unwrap_or_default();
        snapshot.push(core, mode, value);
    }
    snapshot
}

/// (idle, total) seconds for one core. A missing idle mode counts as zero.
fn idle_and_total(samples: &[CoreSample]) -> (f64, f64) {
    samples.iter().fold((0.0, 0.0), |(idle, total), s| {
        let idle = if s.mode == IDLE_MODE { s.value } else { idle };
        (idle, total + s.value)
    })
}

/// Utilization of one core: `1 - idle_delta / total_delta`.
///
/// Fails with `DegenerateDelta` when the core has no earlier capture or the total
/// delta is zero. Counters are not assumed monotonic; the ratio is not clamped.
pub fn core_usage(core: &str, previous: Option<&[CoreSample]>, last: &[CoreSample]) -> Result<f64> {
    let degenerate = || CollectError::DegenerateDelta {
        core: core.to_string(),
    };
    let previous = previous.ok_or_else(degenerate)?;
    let (prev_idle, prev_total) = idle_and_total(previous);
    let (last_idle, last_total) = idle_and_total(last);

    let total_delta = last_total - prev_total;
    if total_delta == 0.0 || !total_delta.is_finite() {
        return Err(degenerate());
    }
    Ok(1.0 - (last_idle - prev_idle) / total_delta)
}

/// One record per core in `last`; cores seen only in `previous` are ignored.
pub fn compute_usage(previous: &CoreSnapshot, last: &CoreSnapshot) -> Vec<UsageRecord> {
    last.iter()
        .map(|(core, samples)| {
            let value = match core_usage(core, previous.get(core), samples) {
                Ok(ratio) => format_ratio(ratio),
                Err(e) => {
                    tracing::debug!(error = %e, operation = "compute_usage", "usage unavailable");
                    USAGE_UNAVAILABLE.to_string()
                }
            };
            UsageRecord {
                id: core.to_string(),
                value,
            }
        })
        .collect()
}

/// Fixed two-decimal text used for usage and temperature values.
pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}
