//! Seed fill
//!
//! Breadth-first flood fill from a single seed over a plane (4-connected)
//! or a volume (6-connected). Diagonal neighbors are never visited, so a
//! fill cannot leak through cells that only touch at a corner.
//!
//! The fill is driven by two functors: a [`Test`] deciding whether a cell
//! is eligible, and a [`Modifier`] writing the label. The test must turn
//! false once a cell has been written (e.g. [`NotDoneTest`] of the label
//! being written), otherwise the fill never terminates.
//!
//! # Examples
//!
//! ```
//! use voxseg_core::{PlaneStepper, Rect, RegionPlane};
//! use voxseg_region::{NotDoneTest, SeedFill2D, SetModifier};
//!
//! let mut plane = RegionPlane::new(8, 8, 1).unwrap();
//! let mut modifier = SetModifier::new(PlaneStepper::new(&mut plane), 3);
//! let filler = SeedFill2D::new(Rect::from_size(8, 8));
//!
//! assert_eq!(filler.fill((2, 2), &NotDoneTest(3), &mut modifier), 64);
//! // Everything already holds the label
//! assert_eq!(filler.fill((0, 0), &NotDoneTest(3), &mut modifier), 0);
//! ```
//!
//! [`NotDoneTest`]: crate::NotDoneTest

use crate::modifiers::Modifier;
use crate::predicate::Test;
use std::collections::VecDeque;
use voxseg_core::{Box3, Rect};

/// 4-connected seed fill over a half-open rectangle
#[derive(Debug, Clone, Copy)]
pub struct SeedFill2D {
    bounds: Rect,
}

impl SeedFill2D {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Fill the component containing `seed`
    ///
    /// Coordinates are in the modifier stepper's local axes; the cursor's
    /// slice coordinate is left untouched.
    ///
    /// # Arguments
    ///
    /// * `seed` - Starting cell
    /// * `test` - Eligibility of a cell
    /// * `modifier` - Writer; a cell it refuses acts as a wall
    ///
    /// # Returns
    ///
    /// The number of cells written. 0 if the seed is outside the bounds
    /// or fails the test.
    pub fn fill<M, T>(&self, seed: (i32, i32), test: &T, modifier: &mut M) -> usize
    where
        M: Modifier,
        T: Test<M::Stepper> + ?Sized,
    {
        let bounds = self.bounds;
        if !bounds.contains(seed.0, seed.1) {
            return 0;
        }
        modifier.move_to_2d(seed.0, seed.1);
        if !test.test(modifier.stepper()) {
            return 0;
        }

        let mut filled = 0usize;
        let mut queue = VecDeque::new();
        queue.push_back(seed);

        while let Some((x, y)) = queue.pop_front() {
            modifier.move_to_2d(x, y);
            if !test.test(modifier.stepper()) || !modifier.set() {
                continue;
            }
            filled += 1;

            for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                if bounds.contains(nx, ny) {
                    queue.push_back((nx, ny));
                }
            }
        }

        log::debug!("seed fill 2D from {:?}: {} cells", seed, filled);
        filled
    }
}

/// 6-connected seed fill over a half-open box
#[derive(Debug, Clone, Copy)]
pub struct SeedFill3D {
    bounds: Box3,
}

impl SeedFill3D {
    pub fn new(bounds: Box3) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Box3 {
        self.bounds
    }

    /// Fill the component containing `seed`
    ///
    /// Same contract as [`SeedFill2D::fill`], in the stepper's three
    /// local axes.
    pub fn fill<M, T>(&self, seed: (i32, i32, i32), test: &T, modifier: &mut M) -> usize
    where
        M: Modifier,
        T: Test<M::Stepper> + ?Sized,
    {
        let bounds = self.bounds;
        let (sx, sy, sz) = seed;
        if !bounds.contains(sx, sy, sz) {
            return 0;
        }
        modifier.move_to(sx, sy, sz);
        if !test.test(modifier.stepper()) {
            return 0;
        }

        let mut filled = 0usize;
        let mut queue = VecDeque::new();
        queue.push_back(seed);

        while let Some((x, y, z)) = queue.pop_front() {
            modifier.move_to(x, y, z);
            if !test.test(modifier.stepper()) || !modifier.set() {
                continue;
            }
            filled += 1;

            for (nx, ny, nz) in [
                (x - 1, y, z),
                (x + 1, y, z),
                (x, y - 1, z),
                (x, y + 1, z),
                (x, y, z - 1),
                (x, y, z + 1),
            ] {
                if bounds.contains(nx, ny, nz) {
                    queue.push_back((nx, ny, nz));
                }
            }
        }

        log::debug!("seed fill 3D from {:?}: {} cells", seed, filled);
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{SetModifier, TestSetModifier};
    use crate::predicate::{MaskTest, NotDoneTest};
    use voxseg_core::{
        PlaneStepper, RegionPlane, RegionVolume, Stepper, SteppingMode, VolumeStepper,
    };

    fn ring_plane() -> RegionPlane {
        // 5x5 with a closed ring of 1s around (2, 2)
        RegionPlane::from_rows(
            5,
            5,
            1,
            &[
                0, 0, 0, 0, 0, //
                0, 1, 1, 1, 0, //
                0, 1, 0, 1, 0, //
                0, 1, 1, 1, 0, //
                0, 0, 0, 0, 0, //
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fill_inside_ring() {
        let mut plane = ring_plane();
        let filler = SeedFill2D::new(Rect::from_size(5, 5));
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 2);
        let count = filler.fill((2, 2), &MaskTest(0u16), &mut m);
        assert_eq!(count, 1);
        drop(m);
        assert_eq!(plane.at(2, 2), 2);
        assert_eq!(plane.count_value(0), 16);
    }

    #[test]
    fn test_fill_outside_ring() {
        let mut plane = ring_plane();
        let filler = SeedFill2D::new(Rect::from_size(5, 5));
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 2);
        assert_eq!(filler.fill((0, 0), &MaskTest(0u16), &mut m), 16);
    }

    #[test]
    fn test_seed_fails_test() {
        let mut plane = ring_plane();
        let before = plane.clone();
        let filler = SeedFill2D::new(Rect::from_size(5, 5));
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 2);
        assert_eq!(filler.fill((1, 1), &MaskTest(0u16), &mut m), 0);
        assert_eq!(filler.fill((7, 1), &MaskTest(0u16), &mut m), 0);
        drop(m);
        assert_eq!(plane, before);
    }

    #[test]
    fn test_fill_respects_bounds() {
        let mut plane = RegionPlane::new(6, 6, 1).unwrap();
        let filler = SeedFill2D::new(Rect::new(1, 1, 3, 2).unwrap());
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 1);
        assert_eq!(filler.fill((2, 1), &NotDoneTest(1u16), &mut m), 6);
        drop(m);
        assert_eq!(plane.at(0, 1), 0);
        assert_eq!(plane.at(3, 2), 1);
        assert_eq!(plane.at(4, 2), 0);
    }

    #[test]
    fn test_refused_cells_are_walls() {
        let mut plane = RegionPlane::from_rows(3, 1, 0, &[0, 9, 0]).unwrap();
        let filler = SeedFill2D::new(Rect::from_size(3, 1));
        let mut m = TestSetModifier::new(
            PlaneStepper::new(&mut plane),
            4,
            |s: &PlaneStepper<&mut RegionPlane>| s.get() != 9,
        );
        assert_eq!(filler.fill((0, 0), &NotDoneTest(4u16), &mut m), 1);
    }

    #[test]
    fn test_fill_3d_slab() {
        let mut vol = RegionVolume::new(4, 4, 4, 1).unwrap();
        // wall at z == 2
        for y in 0..4 {
            for x in 0..4 {
                vol.set_at(x, y, 2, 7);
            }
        }
        let filler = SeedFill3D::new(voxseg_core::Box3::from_size(4, 4, 4));
        let mut m = SetModifier::new(VolumeStepper::new(&mut vol, SteppingMode::Volume), 1);
        assert_eq!(filler.fill((0, 0, 0), &MaskTest(0u16), &mut m), 32);
        drop(m);
        assert_eq!(vol.count_value(1), 32);
        assert_eq!(vol.at(0, 0, 3), 0);
    }

    #[test]
    fn test_fill_2d_on_xz_slice() {
        let mut vol = RegionVolume::new(3, 3, 3, 0).unwrap();
        let filler = SeedFill2D::new(Rect::from_size(3, 3));
        let mut stepper = VolumeStepper::new(&mut vol, SteppingMode::PlaneXZ);
        stepper.set_position(0, 0, 1);
        let mut m = SetModifier::new(stepper, 5);
        assert_eq!(filler.fill((1, 1), &NotDoneTest(5u16), &mut m), 9);
        drop(m);
        for z in 0..3 {
            for x in 0..3 {
                assert_eq!(vol.at(x, 1, z), 5);
            }
        }
        assert_eq!(vol.count_value(5), 9);
    }
}
