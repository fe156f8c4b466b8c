//! Error types for voxseg-core
//!
//! Grid construction and size checks report failures through [`Error`].
//! Coordinate access on the hot path does not return errors; it relies on
//! debug assertions and on callers clipping to the declared extents.

use thiserror::Error;

/// voxseg core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid grid dimensions
    #[error("invalid grid dimensions: {x}x{y}x{z}")]
    InvalidDimension { x: u32, y: u32, z: u32 },

    /// Two grids that must match in size do not
    #[error("dimension mismatch: expected {}x{}x{}, got {}x{}x{}", .expected.0, .expected.1, .expected.2, .actual.0, .actual.1, .actual.2)]
    DimensionMismatch {
        expected: (u32, u32, u32),
        actual: (u32, u32, u32),
    },

    /// Coordinate outside the grid extent and its margin
    #[error("coordinate out of bounds: ({x}, {y}, {z})")]
    CoordinateOutOfBounds { x: i32, y: i32, z: i32 },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Histogram requested over a grid with no samples
    #[error("cannot build a histogram from an empty grid")]
    EmptyHistogram,
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
