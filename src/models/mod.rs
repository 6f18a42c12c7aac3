// Domain models: raw metric samples, derived CPU/memory/network records, exported snapshot

mod cpu;
mod disk;
mod memory;
mod network;
mod sample;
mod snapshot;

pub use cpu::{CoreSample, CoreSnapshot, CpuInfo, SensorAttribute, USAGE_UNAVAILABLE, UsageRecord};
pub use disk::DiskInfo;
pub use memory::MemoryRecord;
pub use network::{InterfaceCounters, NetworkMap};
pub use sample::{MetricKind, MetricSample, SampleValue};
pub use snapshot::AggregateSnapshot;
