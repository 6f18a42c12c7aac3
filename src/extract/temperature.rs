// Temperature merge: hwmon sensor labels joined with hwmon readings by sensor key.

use crate::models::{MetricSample, SensorAttribute};
use std::collections::{BTreeMap, HashSet};

use super::format_ratio;

pub const SENSOR_LABEL: &str = "node_hwmon_sensor_label";
pub const TEMP_CELSIUS: &str = "node_hwmon_temp_celsius";

/// Only labels of the form "Core <n>" describe CPU cores.
const CORE_LABEL_PREFIX: &str = "Core";

/// Last `_`-delimited token of a hwmon chip name ("platform_coretemp_0" -> "0").
fn chip_suffix(chip: &str) -> &str {
    chip.rsplit('_').next().unwrap_or(chip)
}

/// Join key shared by label and reading samples: `<chip suffix>_<sensor>`.
pub fn sensor_key(chip: &str, sensor: &str) -> String {
    format!("{}_{}", chip_suffix(chip), sensor)
}

/// Core number from a label such as "Core 3"; `None` for non-core sensors.
fn core_number(label: &str) -> Option<&str> {
    let mut tokens = label.split_whitespace();
    if tokens.next()? != CORE_LABEL_PREFIX {
        return None;
    }
    label.split_whitespace().last()
}

/// Label-derived entries (`id` set, `value` empty) for every "Core" sensor label.
pub fn extract_sensor_labels(samples: &[MetricSample]) -> Vec<SensorAttribute> {
    samples
        .iter()
        .filter(|s| s.name == SENSOR_LABEL)
        .filter_map(|s| {
            let number = core_number(s.label("label")?)?;
            let chip = s.label("chip").unwrap_or_default();
            let sensor = s.label("sensor").unwrap_or_default();
            Some(SensorAttribute {
                id: format!("{}_{}", chip_suffix(chip), number),
                sensor_key: sensor_key(chip, sensor),
                value: String::new(),
            })
        })
        .collect()
}

/// Reading-derived entries (`value` set, `id` empty) for every temperature gauge.
pub fn extract_sensor_readings(samples: &[MetricSample]) -> Vec<SensorAttribute> {
    samples
        .iter()
        .filter(|s| s.name == TEMP_CELSIUS)
        .filter_map(|s| {
            let celsius = s.value()?;
            let chip = s.label("chip").unwrap_or_default();
            let sensor = s.label("sensor").unwrap_or_default();
            Some(SensorAttribute {
                id: String::new(),
                sensor_key: sensor_key(chip, sensor),
                value: format_ratio(celsius),
            })
        })
        .collect()
}

/// Join labels and readings on `sensor_key`. Entries without a counterpart on
/// either side are dropped; when readings share a key the last one wins.
/// Output is ordered by sensor key.
pub fn merge_temperature(
    labels: Vec<SensorAttribute>,
    readings: &[SensorAttribute],
) -> Vec<SensorAttribute> {
    let mut merged: BTreeMap<String, SensorAttribute> = labels
        .into_iter()
        .map(|attr| (attr.sensor_key.clone(), attr))
        .collect();
    let mut matched = HashSet::new();

    for reading in readings {
        if let Some(entry) = merged.get_mut(&reading.sensor_key) {
            entry.value = reading.value.clone();
            matched.insert(reading.sensor_key.as_str());
        }
    }

    merged
        .into_iter()
        .filter(|(key, _)| matched.contains(key.as_str()))
        .map(|(_, attr)| attr)
        .collect()
}
