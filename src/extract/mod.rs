// Extractors: turn one gathered sample set into CPU, temperature, network and memory records.
// Each metric family's label conventions are parsed in exactly one place.

mod cpu;
mod memory;
mod network;
mod temperature;

pub use cpu::{CPU_SECONDS, IDLE_MODE, capture_core_snapshot, compute_usage, core_usage, format_ratio};
pub use memory::{MEM_FREE_BYTES, MEM_TOTAL_BYTES, extract_memory};
pub use network::{RECEIVE_BYTES, TRANSMIT_BYTES, apply_network, extract_network};
pub use temperature::{
    SENSOR_LABEL, TEMP_CELSIUS, extract_sensor_labels, extract_sensor_readings, merge_temperature,
    sensor_key,
};
