//! Line rasterization
//!
//! Integer-stepped lines in 2D and 3D. Both endpoints are always part of
//! the line. Point coordinates map to cells by truncation toward zero, and
//! cells outside the rasterizer's bounds are skipped rather than handed to
//! the modifier.

use crate::modifiers::Modifier;
use std::collections::HashSet;
use voxseg_core::{Box3, Point2, Point3, Rect};

/// Visit the cells of a 2D line from `from` to `to`, both included
///
/// Steps along the dominant axis and moves the minor axis when the
/// accumulated error drops below zero.
pub fn line_cells_2d<F>(from: (i32, i32), to: (i32, i32), mut visit: F)
where
    F: FnMut(i32, i32),
{
    let (x1, y1) = from;
    let (x2, y2) = to;
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x2 > x1 { 1 } else { -1 };
    let sy = if y2 > y1 { 1 } else { -1 };
    let npts = dx.max(dy) + 1;

    let (mut x, mut y) = (x1, y1);
    if dx >= dy {
        let mut err = dx / 2;
        for _ in 0..npts {
            visit(x, y);
            err -= dy;
            if err < 0 {
                y += sy;
                err += dx;
            }
            x += sx;
        }
    } else {
        let mut err = dy / 2;
        for _ in 0..npts {
            visit(x, y);
            err -= dx;
            if err < 0 {
                x += sx;
                err += dy;
            }
            y += sy;
        }
    }
}

/// Visit the cells of a 3D line from `from` to `to`, both included
pub fn line_cells_3d<F>(from: (i32, i32, i32), to: (i32, i32, i32), mut visit: F)
where
    F: FnMut(i32, i32, i32),
{
    let (mut x, mut y, mut z) = from;
    let (x2, y2, z2) = to;
    let (dx, dy, dz) = (x2 - x, y2 - y, z2 - z);
    let (ax, ay, az) = (dx.abs() << 1, dy.abs() << 1, dz.abs() << 1);
    let (sx, sy, sz) = (dx.signum(), dy.signum(), dz.signum());

    if ax >= ay && ax >= az {
        let mut yd = ay - (ax >> 1);
        let mut zd = az - (ax >> 1);
        loop {
            visit(x, y, z);
            if x == x2 {
                break;
            }
            if yd >= 0 {
                y += sy;
                yd -= ax;
            }
            if zd >= 0 {
                z += sz;
                zd -= ax;
            }
            x += sx;
            yd += ay;
            zd += az;
        }
    } else if ay >= ax && ay >= az {
        let mut xd = ax - (ay >> 1);
        let mut zd = az - (ay >> 1);
        loop {
            visit(x, y, z);
            if y == y2 {
                break;
            }
            if xd >= 0 {
                x += sx;
                xd -= ay;
            }
            if zd >= 0 {
                z += sz;
                zd -= ay;
            }
            y += sy;
            xd += ax;
            zd += az;
        }
    } else {
        let mut xd = ax - (az >> 1);
        let mut yd = ay - (az >> 1);
        loop {
            visit(x, y, z);
            if z == z2 {
                break;
            }
            if xd >= 0 {
                x += sx;
                xd -= az;
            }
            if yd >= 0 {
                y += sy;
                yd -= az;
            }
            z += sz;
            xd += ax;
            yd += ay;
        }
    }
}

/// Thin 2D line rasterizer
///
/// Works in the local slice axes of the modifier's stepper.
#[derive(Debug, Clone, Copy)]
pub struct Line2DRasterizer {
    bounds: Rect,
}

impl Line2DRasterizer {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Rasterize one segment
    ///
    /// # Returns
    ///
    /// The number of cells the modifier accepted.
    pub fn rasterize<M: Modifier>(&self, start: Point2, end: Point2, modifier: &mut M) -> usize {
        let mut written = 0;
        line_cells_2d(start.cell(), end.cell(), |x, y| {
            written += self.put(x, y, modifier);
        });
        written
    }

    /// Rasterize a polyline
    ///
    /// A single point rasterizes that cell; an empty slice does nothing.
    /// Joints between segments are visited once.
    pub fn rasterize_stroke<M: Modifier>(&self, points: &[Point2], modifier: &mut M) -> usize {
        match points {
            [] => 0,
            [p] => {
                let (x, y) = p.cell();
                self.put(x, y, modifier)
            }
            _ => {
                let mut written = 0;
                for (i, seg) in points.windows(2).enumerate() {
                    let from = seg[0].cell();
                    line_cells_2d(from, seg[1].cell(), |x, y| {
                        if i == 0 || (x, y) != from {
                            written += self.put(x, y, modifier);
                        }
                    });
                }
                written
            }
        }
    }

    /// Rasterize the closed outline through `points`
    pub fn rasterize_closed<M: Modifier>(&self, points: &[Point2], modifier: &mut M) -> usize {
        let mut written = self.rasterize_stroke(points, modifier);
        if let (Some(&first), Some(&last)) = (points.first(), points.last())
            && points.len() > 2
        {
            let (start, end) = (last.cell(), first.cell());
            line_cells_2d(start, end, |x, y| {
                if (x, y) != start && (x, y) != end {
                    written += self.put(x, y, modifier);
                }
            });
        }
        written
    }

    #[inline]
    fn put<M: Modifier>(&self, x: i32, y: i32, modifier: &mut M) -> usize {
        if !self.bounds.contains(x, y) {
            return 0;
        }
        modifier.move_to_2d(x, y);
        usize::from(modifier.set())
    }
}

/// 3D line rasterizer with optional width
///
/// With a width above one voxel, the line is drawn as a band of parallel
/// lines spaced half a voxel apart along `normal × direction`, the in-plane
/// perpendicular of a cutting plane with the given normal. The band spans
/// offsets `[-width / 2, width / 2)` from the center line.
#[derive(Debug, Clone, Copy)]
pub struct Line3DRasterizer {
    bounds: Box3,
    normal: Point3,
    width: f32,
}

impl Line3DRasterizer {
    /// Thin line rasterizer
    pub fn new(bounds: Box3) -> Self {
        Self {
            bounds,
            normal: Point3::new(0.0, 0.0, 1.0),
            width: 1.0,
        }
    }

    /// Band rasterizer on a plane with normal `normal`
    pub fn with_normal(bounds: Box3, normal: Point3, width: f32) -> Self {
        Self {
            bounds,
            normal,
            width,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn normal(&self) -> Point3 {
        self.normal
    }

    /// Rasterize one segment
    ///
    /// A zero-length segment, or one parallel to the normal, rasterizes the
    /// thin line only.
    ///
    /// # Returns
    ///
    /// The number of cells the modifier accepted. Cells shared by several
    /// band lines count once.
    pub fn rasterize<M: Modifier>(&self, start: Point3, end: Point3, modifier: &mut M) -> usize {
        let ortho = self.normal.cross(end - start).normalized();
        match ortho {
            Some(ortho) if self.width > 1.0 => {
                let mut seen = HashSet::new();
                self.band(start, end, ortho, &mut seen, modifier)
            }
            _ => {
                let mut written = 0;
                line_cells_3d(start.cell(), end.cell(), |x, y, z| {
                    written += self.put(x, y, z, modifier);
                });
                written
            }
        }
    }

    /// Rasterize a 3D polyline
    ///
    /// Cells shared by consecutive segments count once.
    pub fn rasterize_stroke<M: Modifier>(&self, points: &[Point3], modifier: &mut M) -> usize {
        match points {
            [] => 0,
            [p] => {
                let (x, y, z) = p.cell();
                self.put(x, y, z, modifier)
            }
            _ => {
                let mut seen = HashSet::new();
                let mut written = 0;
                for seg in points.windows(2) {
                    let (start, end) = (seg[0], seg[1]);
                    match self.normal.cross(end - start).normalized() {
                        Some(ortho) if self.width > 1.0 => {
                            written += self.band(start, end, ortho, &mut seen, modifier);
                        }
                        _ => line_cells_3d(start.cell(), end.cell(), |x, y, z| {
                            if seen.insert((x, y, z)) {
                                written += self.put(x, y, z, modifier);
                            }
                        }),
                    }
                }
                written
            }
        }
    }

    fn band<M: Modifier>(
        &self,
        start: Point3,
        end: Point3,
        ortho: Point3,
        seen: &mut HashSet<(i32, i32, i32)>,
        modifier: &mut M,
    ) -> usize {
        let half = self.width / 2.0;
        let steps = (self.width * 2.0).ceil() as i32;
        let mut written = 0;
        for i in 0..steps {
            let offset = ortho * (-half + i as f32 * 0.5);
            line_cells_3d((start + offset).cell(), (end + offset).cell(), |x, y, z| {
                if seen.insert((x, y, z)) {
                    written += self.put(x, y, z, modifier);
                }
            });
        }
        written
    }

    #[inline]
    fn put<M: Modifier>(&self, x: i32, y: i32, z: i32, modifier: &mut M) -> usize {
        if !self.bounds.contains(x, y, z) {
            return 0;
        }
        modifier.move_to(x, y, z);
        usize::from(modifier.set())
    }
}
