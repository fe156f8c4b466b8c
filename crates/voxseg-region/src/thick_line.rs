//! Thick 2D strokes
//!
//! A stroke wider than one cell is built from filled polygons: one quad
//! per segment, a triangle on the outer side of every joint, and a round
//! cap at both ends. Thickness may differ along x and y, which keeps a
//! stroke round on slices with anisotropic voxel spacing.

use crate::line::Line2DRasterizer;
use crate::modifiers::{Modifier, VisitOnce};
use crate::polygon::PolygonRasterizer;
use voxseg_core::{Point2, Rect};

/// Segments shorter than this are skipped
pub const MIN_SEGMENT_LENGTH: f32 = 0.1;

/// Number of vertices of a round cap
const CAP_VERTICES: usize = 16;

/// Thick polyline rasterizer
#[derive(Debug, Clone, Copy)]
pub struct ThickLine2DRasterizer {
    bounds: Rect,
    x_thickness: f32,
    y_thickness: f32,
}

impl ThickLine2DRasterizer {
    /// Rasterizer with the same thickness along both axes
    pub fn new(bounds: Rect, width: f32) -> Self {
        Self::with_thickness(bounds, width, width)
    }

    /// Rasterizer with independent x and y thickness
    pub fn with_thickness(bounds: Rect, x_thickness: f32, y_thickness: f32) -> Self {
        Self {
            bounds,
            x_thickness,
            y_thickness,
        }
    }

    /// Whether strokes fall back to the thin line
    pub fn is_thin(&self) -> bool {
        self.x_thickness <= 1.0 && self.y_thickness <= 1.0
    }

    /// Rasterize a stroke
    ///
    /// # Returns
    ///
    /// The number of distinct cells written.
    pub fn rasterize_stroke<M: Modifier>(&self, points: &[Point2], modifier: &mut M) -> usize {
        if self.is_thin() {
            return Line2DRasterizer::new(self.bounds).rasterize_stroke(points, modifier);
        }
        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return 0;
        };

        let polygon = PolygonRasterizer::new(self.bounds);
        let mut once = VisitOnce::new(modifier);

        let mut previous: Option<(Point2, Point2)> = None;
        for seg in points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let Some(dir) = (b - a).normalized() else {
                continue;
            };
            if a.distance(b) < MIN_SEGMENT_LENGTH {
                continue;
            }
            let offset = self.offset(dir);
            polygon.rasterize(&[a + offset, b + offset, b - offset, a - offset], &mut once);

            if let Some((prev_dir, prev_offset)) = previous {
                let turn = prev_dir.perp_dot(dir);
                if turn > 0.0 {
                    polygon.rasterize(&[a, a + prev_offset, a + offset], &mut once);
                } else if turn < 0.0 {
                    polygon.rasterize(&[a, a - prev_offset, a - offset], &mut once);
                }
            }
            previous = Some((dir, offset));
        }

        polygon.rasterize(&self.cap(first), &mut once);
        if last != first {
            polygon.rasterize(&self.cap(last), &mut once);
        }
        once.count()
    }

    /// Half-thickness offset perpendicular to `dir`
    fn offset(&self, dir: Point2) -> Point2 {
        let o = dir.orthogonal();
        Point2::new(o.x * self.x_thickness / 2.0, o.y * self.y_thickness / 2.0)
    }

    fn cap(&self, center: Point2) -> [Point2; CAP_VERTICES] {
        let (rx, ry) = (self.x_thickness / 2.0, self.y_thickness / 2.0);
        std::array::from_fn(|i| {
            let a = i as f32 * std::f32::consts::TAU / CAP_VERTICES as f32;
            Point2::new(center.x + a.cos() * rx, center.y + a.sin() * ry)
        })
    }
}
