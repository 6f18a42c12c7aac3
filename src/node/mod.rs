// Host collector: exposes node_* metric families read from procfs/sysfs through a prometheus Registry.

mod linux;

use crate::extract::{CPU_SECONDS, RECEIVE_BYTES, SENSOR_LABEL, TEMP_CELSIUS, TRANSMIT_BYTES};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, Gauge, GaugeVec, Opts};
use std::collections::HashMap;
use std::path::PathBuf;

const RECEIVE_PACKETS: &str = "node_network_receive_packets_total";
const TRANSMIT_PACKETS: &str = "node_network_transmit_packets_total";

/// Fixed families: (name, help, variable labels).
const FAMILIES: [(&str, &str, &[&str]); 6] = [
    (
        CPU_SECONDS,
        "Seconds the CPUs spent in each mode.",
        &["cpu", "mode"],
    ),
    (
        RECEIVE_BYTES,
        "Network device statistic receive_bytes.",
        &["device"],
    ),
    (
        TRANSMIT_BYTES,
        "Network device statistic transmit_bytes.",
        &["device"],
    ),
    (
        RECEIVE_PACKETS,
        "Network device statistic receive_packets.",
        &["device"],
    ),
    (
        TRANSMIT_PACKETS,
        "Network device statistic transmit_packets.",
        &["device"],
    ),
    (
        TEMP_CELSIUS,
        "Hardware monitor for temperature (input).",
        &["chip", "sensor"],
    ),
];

/// Reads host counters on every `collect()`. Each call builds its own metric
/// vectors, so concurrent gathers never share accumulator state.
pub struct NodeCollector {
    procfs: PathBuf,
    sysfs: PathBuf,
    descs: Vec<Desc>,
}

impl NodeCollector {
    pub fn new(procfs: impl Into<PathBuf>, sysfs: impl Into<PathBuf>) -> prometheus::Result<Self> {
        let mut descs = FAMILIES
            .iter()
            .map(|(name, help, labels)| {
                Desc::new(
                    name.to_string(),
                    help.to_string(),
                    labels.iter().map(|l| l.to_string()).collect(),
                    HashMap::new(),
                )
            })
            .collect::<prometheus::Result<Vec<_>>>()?;
        descs.push(Desc::new(
            SENSOR_LABEL.to_string(),
            "Label for given chip and sensor.".to_string(),
            vec!["chip".into(), "sensor".into(), "label".into()],
            HashMap::new(),
        )?);
        Ok(Self {
            procfs: procfs.into(),
            sysfs: sysfs.into(),
            descs,
        })
    }

    fn collect_cpu(&self) -> anyhow::Result<Vec<MetricFamily>> {
        let content = std::fs::read_to_string(self.procfs.join("stat"))?;
        let seconds = CounterVec::new(
            Opts::new(CPU_SECONDS, "Seconds the CPUs spent in each mode."),
            &["cpu", "mode"],
        )?;
        for cpu in linux::parse_proc_stat(&content) {
            for (mode, value) in cpu.modes() {
                seconds.with_label_values(&[cpu.cpu.as_str(), mode]).inc_by(value);
            }
        }
        Ok(seconds.collect())
    }

    fn collect_memory(&self) -> anyhow::Result<Vec<MetricFamily>> {
        let content = std::fs::read_to_string(self.procfs.join("meminfo"))?;
        let mut families = Vec::new();
        for (field, value) in linux::parse_meminfo(&content) {
            let gauge = Gauge::with_opts(Opts::new(
                format!("node_memory_{field}_bytes"),
                format!("Memory information field {field}_bytes."),
            ))?;
            gauge.set(value);
            families.extend(gauge.collect());
        }
        Ok(families)
    }

    fn collect_network(&self) -> anyhow::Result<Vec<MetricFamily>> {
        let content = std::fs::read_to_string(self.procfs.join("net/dev"))?;
        let counter = |name: &str, help: &str| CounterVec::new(Opts::new(name, help), &["device"]);
        let rx_bytes = counter(RECEIVE_BYTES, "Network device statistic receive_bytes.")?;
        let tx_bytes = counter(TRANSMIT_BYTES, "Network device statistic transmit_bytes.")?;
        let rx_packets = counter(RECEIVE_PACKETS, "Network device statistic receive_packets.")?;
        let tx_packets = counter(TRANSMIT_PACKETS, "Network device statistic transmit_packets.")?;
        for dev in linux::parse_net_dev(&content) {
            let device = [dev.device.as_str()];
            rx_bytes.with_label_values(&device).inc_by(dev.rx_bytes);
            tx_bytes.with_label_values(&device).inc_by(dev.tx_bytes);
            rx_packets.with_label_values(&device).inc_by(dev.rx_packets);
            tx_packets.with_label_values(&device).inc_by(dev.tx_packets);
        }
        Ok([rx_bytes, tx_bytes, rx_packets, tx_packets]
            .iter()
            .flat_map(|c| c.collect())
            .collect())
    }

    fn collect_hwmon(&self) -> anyhow::Result<Vec<MetricFamily>> {
        let temps = linux::read_hwmon_temps(&self.sysfs)?;
        let celsius = GaugeVec::new(
            Opts::new(TEMP_CELSIUS, "Hardware monitor for temperature (input)."),
            &["chip", "sensor"],
        )?;
        let labels = GaugeVec::new(
            Opts::new(SENSOR_LABEL, "Label for given chip and sensor."),
            &["chip", "sensor", "label"],
        )?;
        for temp in &temps {
            if let Some(value) = temp.celsius {
                celsius
                    .with_label_values(&[temp.chip.as_str(), temp.sensor.as_str()])
                    .set(value);
            }
            if let Some(label) = &temp.label {
                labels
                    .with_label_values(&[temp.chip.as_str(), temp.sensor.as_str(), label.as_str()])
                    .set(1.0);
            }
        }
        let mut families = celsius.collect();
        families.extend(labels.collect());
        Ok(families)
    }
}

impl Collector for NodeCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut families = Vec::new();
        let parts: [(&str, anyhow::Result<Vec<MetricFamily>>); 4] = [
            ("cpu", self.collect_cpu()),
            ("meminfo", self.collect_memory()),
            ("netdev", self.collect_network()),
            ("hwmon", self.collect_hwmon()),
        ];
        for (collector, result) in parts {
            match result {
                Ok(mut f) => families.append(&mut f),
                Err(e) => tracing::warn!(
                    error = %e,
                    collector,
                    operation = "node_collect",
                    "collector failed"
                ),
            }
        }
        families
    }
}
