// Network interface models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Byte counters for one network device.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InterfaceCounters {
    pub receive: f64,
    pub transmit: f64,
}

/// Device name -> counters. Ordered so the exported JSON is stable.
pub type NetworkMap = BTreeMap<String, InterfaceCounters>;
