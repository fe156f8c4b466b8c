//! Volume, Plane - Margin-bordered voxel and pixel containers
//!
//! Both grids store their cells row-major with a border ring of `margin`
//! cells on every side. Coordinates are signed so that a neighborhood
//! filter centered on an edge cell can read the ring at `-1` or `size`
//! without a separate bounds check.
//!
//! # Storage layout
//!
//! For a volume of extent `X x Y x Z` and margin `m` the storage holds
//! `(X + 2m) * (Y + 2m) * (Z + 2m)` cells. The cell at `(x, y, z)` lives
//! at `((z + m) * sy + (y + m)) * sx + (x + m)` where `sx = X + 2m` and
//! `sy = Y + 2m`.
//!
//! # Examples
//!
//! ```
//! use voxseg_core::{DensityVolume, RegionVolume};
//!
//! let density = DensityVolume::new(16, 16, 8, 1).unwrap();
//! let mut region = RegionVolume::new(16, 16, 8, 1).unwrap();
//! assert!(region.same_size(&density));
//!
//! region.set_at(3, 4, 5, 7);
//! assert_eq!(region.get(3, 4, 5), Some(7));
//! // The margin ring is addressable
//! assert_eq!(region.get(-1, 0, 0), Some(0));
//! // Beyond the margin is not
//! assert_eq!(region.get(-2, 0, 0), None);
//! ```

mod plane;
mod volume;

pub use plane::Plane;
pub use volume::{RowLayout, Spacing, Volume};

/// Density sample type (Hounsfield-like units)
pub type DensityPixel = i16;

/// Region label type, 0 is unlabeled
pub type RegionPixel = u16;

/// 3D density grid
pub type DensityVolume = Volume<DensityPixel>;
/// 3D label grid
pub type RegionVolume = Volume<RegionPixel>;
/// 2D density slice
pub type DensityPlane = Plane<DensityPixel>;
/// 2D label slice
pub type RegionPlane = Plane<RegionPixel>;

/// Label of unassigned cells
pub const UNLABELED: RegionPixel = 0;
