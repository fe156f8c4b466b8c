//! Rect, Box3 - Axis-aligned integer extents
//!
//! Extents are half-open: a rectangle at `(x, y)` of size `w x h` covers
//! the cells `x..x + w` and `y..y + h`. Every rasterizer and seed fill
//! takes one of these to clip the cells it may touch.

use crate::error::{Error, Result};

/// A 2D half-open rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "rectangle size must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a rectangle anchored at the origin
    pub const fn from_size(w: u32, h: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            w: w as i32,
            h: h as i32,
        }
    }

    /// Create a rectangle from two corners, both inclusive
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            w: (x1 - x2).abs() + 1,
            h: (y1 - y2).abs() + 1,
        }
    }

    /// Right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Whether the rectangle covers no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check whether a cell lies inside
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersection of two rectangles, `None` if they do not overlap
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        if r <= x || b <= y {
            None
        } else {
            Some(Rect {
                x,
                y,
                w: r - x,
                h: b - y,
            })
        }
    }

    /// Number of cells covered
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.w as usize * self.h as usize
        }
    }
}

/// A 3D half-open box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
    pub h: i32,
    pub d: i32,
}

impl Box3 {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns an error if any side is negative.
    pub fn new(x: i32, y: i32, z: i32, w: i32, h: i32, d: i32) -> Result<Self> {
        if w < 0 || h < 0 || d < 0 {
            return Err(Error::InvalidParameter(format!(
                "box size must be non-negative: w={}, h={}, d={}",
                w, h, d
            )));
        }
        Ok(Self { x, y, z, w, h, d })
    }

    /// Create a box anchored at the origin
    pub const fn from_size(w: u32, h: u32, d: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            w: w as i32,
            h: h as i32,
            d: d as i32,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn back(&self) -> i32 {
        self.z + self.d
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0 || self.d <= 0
    }

    /// Check whether a cell lies inside
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.x
            && x < self.right()
            && y >= self.y
            && y < self.bottom()
            && z >= self.z
            && z < self.back()
    }

    /// The XY footprint of the box
    pub fn footprint(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }

    /// Number of cells covered
    pub fn volume(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.w as usize * self.h as usize * self.d as usize
        }
    }
}
