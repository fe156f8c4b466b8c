//! Error types for voxseg-cluster

use thiserror::Error;

/// Errors that can occur during density clustering
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxseg_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The density volume has no voxels
    #[error("density volume is empty")]
    EmptyVolume,

    /// A mixture was fitted to an empty sample set
    #[error("no samples to fit")]
    NoSamples,

    /// No contiguous block of free region ids is left
    #[error("cannot allocate {requested} region ids from {first}")]
    RegionIdsExhausted { requested: usize, first: u16 },

    /// Clustering cancelled through its cancel flag
    #[error("clustering cancelled")]
    Cancelled,
}

/// Result type for clustering operations
pub type ClusterResult<T> = Result<T, ClusterError>;
