//! Stroke - Ordered point sequence from one interaction
//!
//! A stroke is consumed by a single rasterization call. Rasterizers take
//! `&[P]` so plain slices work as well; the type exists for the handlers,
//! which accumulate points across pointer events.

use crate::point::{Point2, Point3};

/// Ordered sequence of points
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke<P> {
    points: Vec<P>,
}

/// 2D stroke
pub type Stroke2 = Stroke<Point2>;
/// 3D stroke
pub type Stroke3 = Stroke<Point3>;

impl<P: Copy> Stroke<P> {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: P) {
        self.points.push(point);
    }

    pub fn get(&self, index: usize) -> Option<P> {
        self.points.get(index).copied()
    }

    pub fn first(&self) -> Option<P> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<P> {
        self.points.last().copied()
    }

    /// Points as a slice
    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = P> + '_ {
        self.points.iter().copied()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Take the points out, leaving the stroke empty
    pub fn take(&mut self) -> Vec<P> {
        std::mem::take(&mut self.points)
    }
}

impl Stroke<Point2> {
    /// Sum of segment lengths
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl<P> From<Vec<P>> for Stroke<P> {
    fn from(points: Vec<P>) -> Self {
        Self { points }
    }
}

impl<P> FromIterator<P> for Stroke<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<P> AsRef<[P]> for Stroke<P> {
    fn as_ref(&self) -> &[P] {
        &self.points
    }
}
