//! Point2, Point3 - Continuous coordinates in voxel units
//!
//! Strokes and rasterizer inputs are carried as `f32` points. A point maps
//! to the cell containing it by truncating each coordinate toward zero.

use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Cell containing the point
    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }

    #[inline]
    pub fn dot(&self, other: Point2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product
    #[inline]
    pub fn perp_dot(&self, other: Point2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    /// Unit vector in the same direction, `None` for the zero vector
    pub fn normalized(&self) -> Option<Point2> {
        let len = self.length();
        if len > f32::EPSILON {
            Some(Point2::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// Vector rotated by a quarter turn, `(y, -x)`
    #[inline]
    pub fn orthogonal(&self) -> Point2 {
        Point2::new(self.y, -self.x)
    }

    #[inline]
    pub fn distance(&self, other: Point2) -> f32 {
        (*self - other).length()
    }
}

impl Add for Point2 {
    type Output = Point2;
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point2 {
    type Output = Point2;
    fn mul(self, rhs: f32) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2 {
    type Output = Point2;
    fn neg(self) -> Point2 {
        Point2::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Point2 {
    fn from((x, y): (f32, f32)) -> Self {
        Point2::new(x, y)
    }
}

/// A 3D point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Cell containing the point
    #[inline]
    pub fn cell(&self) -> (i32, i32, i32) {
        (self.x as i32, self.y as i32, self.z as i32)
    }

    #[inline]
    pub fn dot(&self, other: Point3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    /// Unit vector in the same direction, `None` for the zero vector
    pub fn normalized(&self) -> Option<Point3> {
        let len = self.length();
        if len > f32::EPSILON {
            Some(Point3::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Point3 {
    type Output = Point3;
    fn mul(self, rhs: f32) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<(f32, f32, f32)> for Point3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Point3::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_truncates() {
        assert_eq!(Point2::new(2.9, 0.1).cell(), (2, 0));
        assert_eq!(Point3::new(1.5, 7.99, 3.0).cell(), (1, 7, 3));
    }

    #[test]
    fn test_cross_product() {
        let x = Point3::new(1.0, 0.0, 0.0);
        let y = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_normalized_zero() {
        assert!(Point2::default().normalized().is_none());
        let n = Point2::new(3.0, 4.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
