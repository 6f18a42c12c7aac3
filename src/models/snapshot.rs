// Exported snapshot

use serde::{Deserialize, Serialize};

use super::{CpuInfo, DiskInfo, MemoryRecord, NetworkMap};

/// One collection cycle's output, serialized as the delivery payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub memory: MemoryRecord,
    #[serde(rename = "cpus")]
    pub cpu: CpuInfo,
    pub network: NetworkMap,
    pub disks: Vec<DiskInfo>,
}
