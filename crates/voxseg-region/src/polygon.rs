//! Scanline polygon fill
//!
//! Fills the interior of a closed polygon with the even-odd rule, then
//! paints its outline so thin parts that no pixel center falls into are
//! still covered.
//!
//! Each row `y` is sampled at `y + 0.5`. An edge contributes an
//! intersection when the sample height lies in its half-open range
//! `[start.y, end.y)`. A pixel is inside a span when its center `x + 0.5`
//! lies in `[x_a, x_b)` for a pair of successive sorted intersections.

use crate::line::line_cells_2d;
use crate::modifiers::Modifier;
use std::collections::HashSet;
use voxseg_core::{Point2, Rect};

/// Non-horizontal polygon edge with `start.y < end.y`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Point2,
    pub end: Point2,
}

impl Edge {
    /// x where the edge crosses height `y`, if `y` is in `[start.y, end.y)`
    #[inline]
    pub fn intersect(&self, y: f32) -> Option<f32> {
        if y < self.start.y || y >= self.end.y {
            return None;
        }
        let t = (y - self.start.y) / (self.end.y - self.start.y);
        Some(self.start.x + t * (self.end.x - self.start.x))
    }
}

/// Filled run of pixels `x0..=x1` on row `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: i32,
    pub x0: i32,
    pub x1: i32,
}

/// Edge list of the closed polygon through `points`
///
/// Horizontal edges are dropped. Returns the edges and the row range
/// `(min_y, max_y)` they cover, or `None` if no edge remains.
pub fn build_edges(points: &[Point2]) -> Option<(Vec<Edge>, f32, f32)> {
    let n = points.len();
    let mut edges = Vec::with_capacity(n);
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if a.y == b.y {
            continue;
        }
        let (start, end) = if a.y < b.y { (a, b) } else { (b, a) };
        min_y = min_y.min(start.y);
        max_y = max_y.max(end.y);
        edges.push(Edge { start, end });
    }

    if edges.is_empty() {
        None
    } else {
        Some((edges, min_y, max_y))
    }
}

/// Interior spans of the polygon clipped to `bounds`
pub fn scan_spans(points: &[Point2], bounds: Rect) -> Vec<Span> {
    let mut spans = Vec::new();
    if points.len() < 3 || bounds.is_empty() {
        return spans;
    }
    let Some((edges, min_y, max_y)) = build_edges(points) else {
        return spans;
    };

    let first_row = (min_y.floor() as i32).max(bounds.y);
    let last_row = (max_y.ceil() as i32).min(bounds.bottom() - 1);
    let mut xs: Vec<f32> = Vec::with_capacity(edges.len());

    for y in first_row..=last_row {
        let fy = y as f32 + 0.5;
        xs.clear();
        xs.extend(edges.iter().filter_map(|e| e.intersect(fy)));
        xs.sort_by(f32::total_cmp);

        for pair in xs.chunks_exact(2) {
            let x0 = ((pair[0] - 0.5).ceil() as i32).max(bounds.x);
            let x1 = ((pair[1] - 0.5).ceil() as i32 - 1).min(bounds.right() - 1);
            if x0 <= x1 {
                spans.push(Span { y, x0, x1 });
            }
        }
    }
    spans
}

/// Polygon rasterizer
///
/// # Examples
///
/// ```
/// use voxseg_core::{PlaneStepper, Point2, Rect, RegionPlane};
/// use voxseg_region::{PolygonRasterizer, SetModifier};
///
/// let mut plane = RegionPlane::new(10, 10, 0).unwrap();
/// let mut modifier = SetModifier::new(PlaneStepper::new(&mut plane), 1);
/// let square = [
///     Point2::new(2.0, 2.0),
///     Point2::new(6.0, 2.0),
///     Point2::new(6.0, 6.0),
///     Point2::new(2.0, 6.0),
/// ];
/// let n = PolygonRasterizer::new(Rect::from_size(10, 10)).rasterize(&square, &mut modifier);
/// assert_eq!(n, 25);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PolygonRasterizer {
    bounds: Rect,
}

impl PolygonRasterizer {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Fill the polygon and paint its outline
    ///
    /// Fewer than three points is a no-op. Outline cells already covered
    /// by the fill are not visited twice.
    ///
    /// # Returns
    ///
    /// The number of cells the modifier accepted.
    pub fn rasterize<M: Modifier>(&self, points: &[Point2], modifier: &mut M) -> usize {
        if points.len() < 3 {
            return 0;
        }

        let spans = scan_spans(points, self.bounds);
        let mut filled = HashSet::new();
        let mut written = 0;
        for span in &spans {
            for x in span.x0..=span.x1 {
                filled.insert((x, span.y));
                modifier.move_to_2d(x, span.y);
                if modifier.set() {
                    written += 1;
                }
            }
        }

        let n = points.len();
        for i in 0..n {
            let from = points[i].cell();
            let to = points[(i + 1) % n].cell();
            line_cells_2d(from, to, |x, y| {
                if self.bounds.contains(x, y) && filled.insert((x, y)) {
                    modifier.move_to_2d(x, y);
                    if modifier.set() {
                        written += 1;
                    }
                }
            });
        }

        log::trace!(
            "polygon with {} vertices: {} spans, {} cells",
            n,
            spans.len(),
            written
        );
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::SetModifier;
    use voxseg_core::{PlaneStepper, RegionPlane};

    #[test]
    fn test_build_edges_drops_horizontal() {
        let tri = [
            Point2::new(0.0, 4.0),
            Point2::new(4.0, 4.0),
            Point2::new(2.0, 0.0),
        ];
        let (edges, min_y, max_y) = build_edges(&tri).unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.start.y < e.end.y));
        assert_eq!((min_y, max_y), (0.0, 4.0));

        let flat = [Point2::new(0.0, 1.0), Point2::new(3.0, 1.0), Point2::new(5.0, 1.0)];
        assert!(build_edges(&flat).is_none());
    }

    #[test]
    fn test_edge_half_open() {
        let e = Edge {
            start: Point2::new(0.0, 0.0),
            end: Point2::new(4.0, 4.0),
        };
        assert_eq!(e.intersect(0.0), Some(0.0));
        assert_eq!(e.intersect(2.0), Some(2.0));
        assert_eq!(e.intersect(4.0), None);
    }

    #[test]
    fn test_square_spans() {
        let square = [
            Point2::new(1.0, 1.0),
            Point2::new(4.0, 1.0),
            Point2::new(4.0, 4.0),
            Point2::new(1.0, 4.0),
        ];
        let spans = scan_spans(&square, Rect::from_size(8, 8));
        assert_eq!(
            spans,
            vec![
                Span { y: 1, x0: 1, x1: 3 },
                Span { y: 2, x0: 1, x1: 3 },
                Span { y: 3, x0: 1, x1: 3 },
            ]
        );
    }

    #[test]
    fn test_degenerate_polygon() {
        let mut plane = RegionPlane::new(8, 8, 0).unwrap();
        let raster = PolygonRasterizer::new(Rect::from_size(8, 8));
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 1);
        let two = [Point2::new(1.0, 1.0), Point2::new(6.0, 6.0)];
        assert_eq!(raster.rasterize(&two, &mut m), 0);
        assert_eq!(raster.rasterize(&[], &mut m), 0);
        drop(m);
        assert_eq!(plane.count_value(1), 0);
    }

    #[test]
    fn test_clipped_polygon() {
        let mut plane = RegionPlane::new(4, 4, 1).unwrap();
        let raster = PolygonRasterizer::new(Rect::from_size(4, 4));
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 1);
        let big = [
            Point2::new(-5.0, -5.0),
            Point2::new(10.0, -5.0),
            Point2::new(10.0, 10.0),
            Point2::new(-5.0, 10.0),
        ];
        assert_eq!(raster.rasterize(&big, &mut m), 16);
        drop(m);
        assert_eq!(plane.at(-1, 0), 0);
    }
}
