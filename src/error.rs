// Error types for collection and export.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectError>;

#[derive(Error, Debug)]
pub enum CollectError {
    /// The metrics source could not produce a sample set.
    #[error("metrics source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    /// Total CPU seconds did not move between the two captures (or the core is
    /// missing from the earlier one), so utilization is undefined.
    #[error("degenerate CPU delta for core {core}")]
    DegenerateDelta { core: String },

    #[error("failed to serialize snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to deliver snapshot to {endpoint}: {reason}")]
    Delivery { endpoint: String, reason: String },
}
