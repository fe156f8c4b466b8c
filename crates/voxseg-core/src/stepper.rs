//! Grid cursors
//!
//! A stepper carries an integer position and a reference to one grid.
//! Tests and modifiers evaluate against the stepper's current cell, so
//! traversal code only moves the cursor and never touches cell values
//! itself.
//!
//! Positions are expressed in *local* axes. In [`SteppingMode::Volume`]
//! local axes are the grid axes. In the plane modes the first two local
//! axes span the slice and the third one holds the slice index, so 2D
//! algorithms can run unchanged on an XZ or YZ slice of a volume:
//!
//! | Mode      | local X | local Y | local Z |
//! |-----------|---------|---------|---------|
//! | `Volume`  | x       | y       | z       |
//! | `PlaneXY` | x       | y       | z       |
//! | `PlaneXZ` | x       | z       | y       |
//! | `PlaneYZ` | y       | z       | x       |
//!
//! # Examples
//!
//! ```
//! use voxseg_core::{Axis, RegionVolume, Stepper, StepperMut, SteppingMode, VolumeStepper};
//!
//! let mut region = RegionVolume::new(8, 8, 8, 1).unwrap();
//! {
//!     let mut stepper = VolumeStepper::new(&mut region, SteppingMode::PlaneXZ);
//!     stepper.set_position(2, 5, 3); // x = 2, z = 5, slice y = 3
//!     stepper.inc(Axis::Y); // moves along z
//!     stepper.set(4);
//! }
//! assert_eq!(region.at(2, 3, 6), 4);
//! ```

use crate::error::{Error, Result};
use crate::grid::{Plane, Volume};
use std::ops::{Deref, DerefMut};

/// How local stepper axes map onto grid axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SteppingMode {
    /// Full 3D traversal
    #[default]
    Volume,
    /// Slice of constant z
    PlaneXY,
    /// Slice of constant y
    PlaneXZ,
    /// Slice of constant x
    PlaneYZ,
}

impl SteppingMode {
    /// Grid axis index of each local axis
    pub const fn axes(self) -> [usize; 3] {
        match self {
            SteppingMode::Volume | SteppingMode::PlaneXY => [0, 1, 2],
            SteppingMode::PlaneXZ => [0, 2, 1],
            SteppingMode::PlaneYZ => [1, 2, 0],
        }
    }

    /// Whether the mode restricts traversal to one slice
    pub const fn is_plane(self) -> bool {
        !matches!(self, SteppingMode::Volume)
    }

    /// Convert a local position to grid coordinates
    pub fn to_grid(self, local: [i32; 3]) -> (i32, i32, i32) {
        let a = self.axes();
        let mut g = [0i32; 3];
        g[a[0]] = local[0];
        g[a[1]] = local[1];
        g[a[2]] = local[2];
        (g[0], g[1], g[2])
    }

    /// Convert grid coordinates to a local position
    pub fn to_local(self, (x, y, z): (i32, i32, i32)) -> [i32; 3] {
        let g = [x, y, z];
        let a = self.axes();
        [g[a[0]], g[a[1]], g[a[2]]]
    }
}

/// Local stepper axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

/// Read access to the cell under a cursor
pub trait Stepper {
    /// Cell type of the underlying grid
    type Value: Copy;

    fn mode(&self) -> SteppingMode;

    /// Extent of the underlying grid in grid axes
    fn dimensions(&self) -> (u32, u32, u32);

    /// Current local position
    fn position(&self) -> [i32; 3];

    /// Move to a local position
    fn set_position(&mut self, x: i32, y: i32, z: i32);

    /// Move within the current slice, keeping the local Z coordinate
    fn set_position_2d(&mut self, x: i32, y: i32) {
        let [_, _, z] = self.position();
        self.set_position(x, y, z);
    }

    /// Move by `delta` cells along a local axis
    fn step(&mut self, axis: Axis, delta: i32);

    #[inline]
    fn inc(&mut self, axis: Axis) {
        self.step(axis, 1);
    }

    #[inline]
    fn dec(&mut self, axis: Axis) {
        self.step(axis, -1);
    }

    /// Whether the cursor is inside the grid extent, margin excluded
    fn is_in(&self) -> bool;

    /// Value at the cursor
    ///
    /// The cursor must be inside the extent or its margin.
    fn get(&self) -> Self::Value;

    /// Current position in grid coordinates
    fn grid_position(&self) -> (i32, i32, i32) {
        self.mode().to_grid(self.position())
    }

    /// Grid extent along a local axis
    fn extent(&self, axis: Axis) -> i32 {
        let (x, y, z) = self.dimensions();
        [x, y, z][self.mode().axes()[axis as usize]] as i32
    }
}

/// Write access to the cell under a cursor
pub trait StepperMut: Stepper {
    fn set(&mut self, value: Self::Value);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Cursor {
    mode: SteppingMode,
    pos: [i32; 3],
}

impl Cursor {
    #[inline]
    fn step(&mut self, axis: Axis, delta: i32) {
        self.pos[axis as usize] += delta;
    }
}

/// Cursor over a [`Volume`]
///
/// `G` is any handle that dereferences to the volume: `&Volume<T>` for
/// read-only traversal, `&mut Volume<T>` when the stepper must also write.
#[derive(Debug)]
pub struct VolumeStepper<G> {
    grid: G,
    cursor: Cursor,
}

impl<G> VolumeStepper<G> {
    /// Create a stepper positioned at the origin
    pub fn new(grid: G, mode: SteppingMode) -> Self {
        Self {
            grid,
            cursor: Cursor { mode, pos: [0; 3] },
        }
    }

    /// Release the grid handle
    pub fn into_inner(self) -> G {
        self.grid
    }
}

impl<T: Copy, G: Deref<Target = Volume<T>>> VolumeStepper<G> {
    pub fn grid(&self) -> &Volume<T> {
        &self.grid
    }
}

impl<T: Copy, G: Deref<Target = Volume<T>>> Stepper for VolumeStepper<G> {
    type Value = T;

    #[inline]
    fn mode(&self) -> SteppingMode {
        self.cursor.mode
    }

    fn dimensions(&self) -> (u32, u32, u32) {
        self.grid.dimensions()
    }

    #[inline]
    fn position(&self) -> [i32; 3] {
        self.cursor.pos
    }

    #[inline]
    fn set_position(&mut self, x: i32, y: i32, z: i32) {
        self.cursor.pos = [x, y, z];
    }

    #[inline]
    fn step(&mut self, axis: Axis, delta: i32) {
        self.cursor.step(axis, delta);
    }

    #[inline]
    fn is_in(&self) -> bool {
        let (x, y, z) = self.grid_position();
        self.grid.is_in(x, y, z)
    }

    #[inline]
    fn get(&self) -> T {
        let (x, y, z) = self.grid_position();
        self.grid.at(x, y, z)
    }
}

impl<T: Copy, G: DerefMut<Target = Volume<T>>> StepperMut for VolumeStepper<G> {
    #[inline]
    fn set(&mut self, value: T) {
        let (x, y, z) = self.grid_position();
        self.grid.set_at(x, y, z, value);
    }
}

/// Cursor over a [`Plane`]
///
/// Always in [`SteppingMode::PlaneXY`]; the local Z coordinate is carried
/// but ignored.
#[derive(Debug)]
pub struct PlaneStepper<G> {
    grid: G,
    cursor: Cursor,
}

impl<G> PlaneStepper<G> {
    pub fn new(grid: G) -> Self {
        Self {
            grid,
            cursor: Cursor {
                mode: SteppingMode::PlaneXY,
                pos: [0; 3],
            },
        }
    }

    pub fn into_inner(self) -> G {
        self.grid
    }
}

impl<T: Copy, G: Deref<Target = Plane<T>>> PlaneStepper<G> {
    pub fn grid(&self) -> &Plane<T> {
        &self.grid
    }
}

impl<T: Copy, G: Deref<Target = Plane<T>>> Stepper for PlaneStepper<G> {
    type Value = T;

    fn mode(&self) -> SteppingMode {
        SteppingMode::PlaneXY
    }

    fn dimensions(&self) -> (u32, u32, u32) {
        let (x, y) = self.grid.dimensions();
        (x, y, 1)
    }

    #[inline]
    fn position(&self) -> [i32; 3] {
        self.cursor.pos
    }

    #[inline]
    fn set_position(&mut self, x: i32, y: i32, z: i32) {
        self.cursor.pos = [x, y, z];
    }

    #[inline]
    fn step(&mut self, axis: Axis, delta: i32) {
        self.cursor.step(axis, delta);
    }

    #[inline]
    fn is_in(&self) -> bool {
        let [x, y, _] = self.cursor.pos;
        self.grid.is_in(x, y)
    }

    #[inline]
    fn get(&self) -> T {
        let [x, y, _] = self.cursor.pos;
        self.grid.at(x, y)
    }
}

impl<T: Copy, G: DerefMut<Target = Plane<T>>> StepperMut for PlaneStepper<G> {
    #[inline]
    fn set(&mut self, value: T) {
        let [x, y, _] = self.cursor.pos;
        self.grid.set_at(x, y, value);
    }
}

/// Two steppers moving in lock step
///
/// Reads and writes go to the primary grid. The secondary grid is only
/// reachable through [`secondary`](Self::secondary), typically to test a
/// density value while painting labels.
#[derive(Debug)]
pub struct JoinedStepper<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Stepper, S: Stepper> JoinedStepper<P, S> {
    /// Join two steppers over grids of the same extent
    ///
    /// The secondary stepper is moved to the primary's position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the grid extents differ and
    /// [`Error::InvalidParameter`] if the stepping modes differ.
    pub fn new(primary: P, mut secondary: S) -> Result<Self> {
        if primary.dimensions() != secondary.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: primary.dimensions(),
                actual: secondary.dimensions(),
            });
        }
        if primary.mode() != secondary.mode() {
            return Err(Error::InvalidParameter(format!(
                "joined steppers must share a mode: {:?} vs {:?}",
                primary.mode(),
                secondary.mode()
            )));
        }
        let [x, y, z] = primary.position();
        secondary.set_position(x, y, z);
        Ok(Self { primary, secondary })
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    pub fn into_parts(self) -> (P, S) {
        (self.primary, self.secondary)
    }
}

impl<P: Stepper, S: Stepper> Stepper for JoinedStepper<P, S> {
    type Value = P::Value;

    fn mode(&self) -> SteppingMode {
        self.primary.mode()
    }

    fn dimensions(&self) -> (u32, u32, u32) {
        self.primary.dimensions()
    }

    fn position(&self) -> [i32; 3] {
        self.primary.position()
    }

    fn set_position(&mut self, x: i32, y: i32, z: i32) {
        self.primary.set_position(x, y, z);
        self.secondary.set_position(x, y, z);
    }

    fn step(&mut self, axis: Axis, delta: i32) {
        self.primary.step(axis, delta);
        self.secondary.step(axis, delta);
    }

    fn is_in(&self) -> bool {
        self.primary.is_in()
    }

    fn get(&self) -> P::Value {
        self.primary.get()
    }
}

impl<P: StepperMut, S: Stepper> StepperMut for JoinedStepper<P, S> {
    fn set(&mut self, value: P::Value) {
        self.primary.set(value);
    }
}
