// Network extractor: per-device receive/transmit byte counters.

use crate::models::{MetricSample, NetworkMap};

pub const RECEIVE_BYTES: &str = "node_network_receive_bytes_total";
pub const TRANSMIT_BYTES: &str = "node_network_transmit_bytes_total";

/// Update `network` in place. Devices are created on first sight; a later sample
/// for the same device and direction overwrites the earlier one.
pub fn apply_network(network: &mut NetworkMap, samples: &[MetricSample]) {
    for sample in samples {
        let receive = match sample.name.as_str() {
            RECEIVE_BYTES => true,
            TRANSMIT_BYTES => false,
            _ => continue,
        };
        let (Some(device), Some(value)) = (sample.label("device"), sample.value()) else {
            continue;
        };
        let counters = network.entry(device.to_string()).or_default();
        if receive {
            counters.receive = value;
        } else {
            counters.transmit = value;
        }
    }
}

pub fn extract_network(samples: &[MetricSample]) -> NetworkMap {
    let mut network = NetworkMap::new();
    apply_network(&mut network, samples);
    network
}
