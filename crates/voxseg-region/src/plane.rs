//! Projection onto canonical slice planes
//!
//! Interaction strokes arrive as 3D points on a slice; a
//! [`PlaneRasterizer`] drops the slice axis so the 2D rasterizers can run
//! on that slice. The modifier's stepper must use the matching
//! [`SteppingMode`], which makes its local axes agree with the projection.

use crate::modifiers::Modifier;
use voxseg_core::{Point2, Point3, Rect, SteppingMode, Stroke2};

/// Canonical slice plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Projection {
    /// Slice of constant z, projects to `(x, y)`
    #[default]
    XY,
    /// Slice of constant y, projects to `(x, z)`
    XZ,
    /// Slice of constant x, projects to `(y, z)`
    YZ,
}

impl Projection {
    #[inline]
    pub fn project(self, p: Point3) -> Point2 {
        match self {
            Projection::XY => Point2::new(p.x, p.y),
            Projection::XZ => Point2::new(p.x, p.z),
            Projection::YZ => Point2::new(p.y, p.z),
        }
    }

    /// Coordinate along the dropped axis
    #[inline]
    pub fn depth(self, p: Point3) -> f32 {
        match self {
            Projection::XY => p.z,
            Projection::XZ => p.y,
            Projection::YZ => p.x,
        }
    }

    /// Stepper mode whose local axes match this projection
    pub fn stepping_mode(self) -> SteppingMode {
        match self {
            Projection::XY => SteppingMode::PlaneXY,
            Projection::XZ => SteppingMode::PlaneXZ,
            Projection::YZ => SteppingMode::PlaneYZ,
        }
    }

    /// In-plane extent `(width, height)` of a volume of the given size
    pub fn plane_size(self, (x, y, z): (u32, u32, u32)) -> (u32, u32) {
        match self {
            Projection::XY => (x, y),
            Projection::XZ => (x, z),
            Projection::YZ => (y, z),
        }
    }
}

/// Writes projected 3D points into a slice
#[derive(Debug, Clone, Copy)]
pub struct PlaneRasterizer {
    projection: Projection,
    bounds: Rect,
}

impl PlaneRasterizer {
    pub fn new(projection: Projection, bounds: Rect) -> Self {
        Self { projection, bounds }
    }

    pub fn xy(bounds: Rect) -> Self {
        Self::new(Projection::XY, bounds)
    }

    pub fn xz(bounds: Rect) -> Self {
        Self::new(Projection::XZ, bounds)
    }

    pub fn yz(bounds: Rect) -> Self {
        Self::new(Projection::YZ, bounds)
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn project(&self, p: Point3) -> Point2 {
        self.projection.project(p)
    }

    /// Whether the projected cell lies inside the bounds
    #[inline]
    pub fn test_point(&self, p: Point3) -> bool {
        let (u, v) = self.project(p).cell();
        self.bounds.contains(u, v)
    }

    /// Write the projected cell if it is in bounds and accepted
    pub fn set<M: Modifier>(&self, p: Point3, modifier: &mut M) -> bool {
        if !self.test_point(p) {
            return false;
        }
        self.set_simple(p, modifier)
    }

    /// Write the projected cell without the bounds test
    ///
    /// The caller guarantees the cell is addressable.
    pub fn set_simple<M: Modifier>(&self, p: Point3, modifier: &mut M) -> bool {
        let (u, v) = self.project(p).cell();
        modifier.move_to_2d(u, v);
        modifier.set()
    }

    /// Project every point of a stroke
    pub fn project_stroke(&self, points: &[Point3]) -> Stroke2 {
        points.iter().map(|&p| self.project(p)).collect()
    }
}
