// Disk info via sysinfo

use crate::models::DiskInfo;
use std::sync::{Arc, Mutex};
use sysinfo::Disks;
use tracing::instrument;

/// Disk collaborator: returns finished disk records consumed as-is by the assembler.
pub trait DiskInfoSource: Send + Sync {
    fn get_info(&self) -> anyhow::Result<Vec<DiskInfo>>;
}

pub struct DiskRepo {
    disks: Arc<Mutex<Disks>>,
}

impl Default for DiskRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskRepo {
    pub fn new() -> Self {
        Self {
            disks: Arc::new(Mutex::new(Disks::new_with_refreshed_list())),
        }
    }
}

impl DiskInfoSource for DiskRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_disk_info"))]
    fn get_info(&self) -> anyhow::Result<Vec<DiskInfo>> {
        let mut disks = self
            .disks
            .lock()
            .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
        disks.refresh(true);
        Ok(disks
            .list()
            .iter()
            .map(|d| {
                let total = d.total_space();
                let available = d.available_space();
                let used = total.saturating_sub(available);
                let usage_percent = if total > 0 {
                    (used as f64 / total as f64) * 100.0
                } else {
                    0.0
                };
                DiskInfo {
                    name: d.name().to_string_lossy().into_owned(),
                    mount: d.mount_point().to_string_lossy().into_owned(),
                    file_system: d.file_system().to_string_lossy().into_owned(),
                    total_space: total,
                    available_space: available,
                    used_space: used,
                    usage_percent,
                }
            })
            .collect())
    }
}
