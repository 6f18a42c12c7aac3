// Memory extractor: total and free bytes gauges.

use crate::models::{MemoryRecord, MetricSample};

pub const MEM_TOTAL_BYTES: &str = "node_memory_MemTotal_bytes";
pub const MEM_FREE_BYTES: &str = "node_memory_MemFree_bytes";

pub fn extract_memory(samples: &[MetricSample]) -> MemoryRecord {
    let mut memory = MemoryRecord::default();
    for sample in samples {
        let Some(value) = sample.value() else {
            continue;
        };
        match sample.name.as_str() {
            MEM_TOTAL_BYTES => memory.total = value,
            MEM_FREE_BYTES => memory.free = value,
            _ => {}
        }
    }
    memory
}
