// Memory model

use serde::{Deserialize, Serialize};

/// Total and free memory in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub total: f64,
    pub free: f64,
}
