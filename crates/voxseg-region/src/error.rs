//! Error types for voxseg-region

use thiserror::Error;

/// Errors that can occur during region operations
///
/// Rasterizers and seed fills never fail on geometric input; these
/// errors come from setup (mismatched grids, bad parameters) and from
/// cancelled long-running passes.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxseg_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Operation cancelled through its cancel flag
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
