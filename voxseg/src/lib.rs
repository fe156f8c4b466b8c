//! voxseg - Region segmentation for voxel volumes and pixel planes
//!
//! # Overview
//!
//! voxseg labels the cells of a region grid that mirrors a density grid:
//!
//! - Seed and flood fills driven by composable cell tests
//! - Line, thick line, polygon and slice projection rasterizers
//! - Density window thresholding
//! - Fuzzy c-means clustering of the density histogram
//! - Pointer handlers for sample-driven and manual segmentation
//!
//! # Example
//!
//! ```
//! use voxseg::region::{NotDoneTest, SeedFill3D, SetModifier};
//! use voxseg::{Box3, RegionVolume, SteppingMode, VolumeStepper};
//!
//! let mut region = RegionVolume::new(4, 4, 4, 1).unwrap();
//! let mut modifier = SetModifier::new(VolumeStepper::new(&mut region, SteppingMode::Volume), 2);
//! let filled = SeedFill3D::new(Box3::from_size(4, 4, 4)).fill((0, 0, 0), &NotDoneTest(2), &mut modifier);
//! assert_eq!(filled, 64);
//! ```

// Re-export core types (grids, steppers and geometry used everywhere)
pub use voxseg_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use voxseg_cluster as cluster;
pub use voxseg_interact as interact;
pub use voxseg_region as region;
