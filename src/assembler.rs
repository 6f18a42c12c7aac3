// Snapshot assembler: structural combination of the per-section outputs.

use crate::models::{
    AggregateSnapshot, CpuInfo, DiskInfo, MemoryRecord, NetworkMap, SensorAttribute, UsageRecord,
};

/// Combine already-derived sections. No validation; an empty section stays empty.
pub fn assemble(
    memory: MemoryRecord,
    usage: Vec<UsageRecord>,
    temperature: Vec<SensorAttribute>,
    network: NetworkMap,
    disks: Vec<DiskInfo>,
) -> AggregateSnapshot {
    AggregateSnapshot {
        memory,
        cpu: CpuInfo { usage, temperature },
        network,
        disks,
    }
}
