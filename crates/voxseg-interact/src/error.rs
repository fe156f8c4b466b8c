//! Error types for voxseg-interact

use thiserror::Error;

/// Errors raised while handling an interaction
#[derive(Debug, Error)]
pub enum InteractError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxseg_core::Error),

    /// Region operation failed
    #[error("region error: {0}")]
    Region(#[from] voxseg_region::RegionError),

    /// Clustering failed
    #[error("cluster error: {0}")]
    Cluster(#[from] voxseg_cluster::ClusterError),
}

/// Result type for interaction handlers
pub type InteractResult<T> = Result<T, InteractError>;
