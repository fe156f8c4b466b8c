//! voxseg-core - Grid and cursor types for region segmentation
//!
//! This crate provides the data structures every other voxseg crate
//! builds on:
//!
//! - [`Volume`] / [`Plane`] - Margin-bordered 3D and 2D grids, aliased as
//!   [`DensityVolume`], [`RegionVolume`], [`DensityPlane`], [`RegionPlane`]
//! - [`Stepper`] / [`StepperMut`] - Cursors that tests and modifiers
//!   evaluate against
//! - [`Point2`] / [`Point3`] / [`Stroke`] - Continuous stroke geometry
//! - [`Rect`] / [`Box3`] - Half-open clipping extents
//! - [`Histogram`] - Density counts for clustering
//! - [`CancelToken`] - Cooperative cancel flag for long passes

pub mod bounds;
pub mod cancel;
pub mod error;
pub mod grid;
pub mod histogram;
pub mod point;
pub mod stepper;
pub mod stroke;

pub use bounds::{Box3, Rect};
pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use grid::{
    DensityPixel, DensityPlane, DensityVolume, Plane, RegionPixel, RegionPlane, RegionVolume,
    RowLayout, Spacing, UNLABELED, Volume,
};
pub use histogram::Histogram;
pub use point::{Point2, Point3};
pub use stepper::{
    Axis, JoinedStepper, PlaneStepper, Stepper, StepperMut, SteppingMode, VolumeStepper,
};
pub use stroke::{Stroke, Stroke2, Stroke3};
