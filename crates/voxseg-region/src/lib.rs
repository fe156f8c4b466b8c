//! voxseg-region - Region growing and rasterization
//!
//! Every operation here writes labels through a [`Modifier`], which wraps
//! a stepper and decides per cell whether a write happens. Fills and
//! rasterizers only produce cell coordinates and count accepted writes.
//!
//! - [`predicate`] - Cell tests and their conjunction [`MultiTest`]
//! - [`modifiers`] - Value-writing wrappers around steppers
//! - [`seedfill`] - 4/6-connected seed fill
//! - [`flood`] - Multi-seed flood fill rasterizers
//! - [`line`], [`thick_line`], [`polygon`] - Stroke rasterizers
//! - [`plane`] - Projection of 3D strokes onto slices
//! - [`morph`] - Dilation and erosion of a region label
//! - [`threshold`] - Density window labelling

pub mod error;
pub mod flood;
pub mod line;
pub mod modifiers;
pub mod morph;
pub mod plane;
pub mod polygon;
pub mod predicate;
pub mod seedfill;
pub mod thick_line;
pub mod threshold;

pub use error::{RegionError, RegionResult};
pub use flood::{FloodFill2DRasterizer, FloodFill3DRasterizer};
pub use line::{Line2DRasterizer, Line3DRasterizer};
pub use modifiers::{
    Modifier, MultiTestSetModifier, SetModifier, TestSetModifier, ValueOf, VisitOnce,
};
pub use morph::{Morphology, StructuringElement};
pub use plane::{PlaneRasterizer, Projection};
pub use polygon::PolygonRasterizer;
pub use predicate::{
    DEFAULT_MAX_TESTS, FillTest, MaskOrZeroTest, MaskTest, MultiTest, NotDoneTest, RangeTest,
    Secondary, Test,
};
pub use seedfill::{SeedFill2D, SeedFill3D};
pub use thick_line::ThickLine2DRasterizer;
pub use threshold::{ThresholdOptions, Thresholding};
