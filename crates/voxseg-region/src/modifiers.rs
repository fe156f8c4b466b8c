//! Cell writers
//!
//! A [`Modifier`] owns a writable stepper and the value to write. Seed
//! fills and rasterizers only move the modifier's cursor and call
//! [`Modifier::set`]; which cells change, and to what, is decided here.

use crate::predicate::{MultiTest, Test};
use std::collections::HashSet;
use voxseg_core::{Stepper, StepperMut};

/// Value type written by a modifier
pub type ValueOf<M> = <<M as Modifier>::Stepper as Stepper>::Value;

/// Conditional writer attached to a stepper
pub trait Modifier {
    type Stepper: StepperMut;

    fn stepper(&self) -> &Self::Stepper;

    fn stepper_mut(&mut self) -> &mut Self::Stepper;

    /// Value written by [`write`](Self::write)
    fn value(&self) -> ValueOf<Self>;

    /// Whether the cell under the cursor may be written
    fn accepts(&self) -> bool;

    /// Write the value unconditionally
    #[inline]
    fn write(&mut self) {
        let v = self.value();
        self.stepper_mut().set(v);
    }

    /// Write the value if the cell is accepted
    ///
    /// # Returns
    ///
    /// `true` if the cell was written.
    #[inline]
    fn set(&mut self) -> bool {
        if self.accepts() {
            self.write();
            true
        } else {
            false
        }
    }

    /// Move the cursor to a local position
    #[inline]
    fn move_to(&mut self, x: i32, y: i32, z: i32) {
        self.stepper_mut().set_position(x, y, z);
    }

    /// Move the cursor within its slice
    #[inline]
    fn move_to_2d(&mut self, x: i32, y: i32) {
        self.stepper_mut().set_position_2d(x, y);
    }
}

/// Writes its value everywhere
#[derive(Debug)]
pub struct SetModifier<S: StepperMut> {
    stepper: S,
    value: S::Value,
}

impl<S: StepperMut> SetModifier<S> {
    pub fn new(stepper: S, value: S::Value) -> Self {
        Self { stepper, value }
    }

    pub fn set_value(&mut self, value: S::Value) {
        self.value = value;
    }

    pub fn into_stepper(self) -> S {
        self.stepper
    }
}

impl<S: StepperMut> Modifier for SetModifier<S> {
    type Stepper = S;

    fn stepper(&self) -> &S {
        &self.stepper
    }

    fn stepper_mut(&mut self) -> &mut S {
        &mut self.stepper
    }

    fn value(&self) -> S::Value {
        self.value
    }

    #[inline]
    fn accepts(&self) -> bool {
        true
    }
}

/// Writes its value where one test passes
#[derive(Debug)]
pub struct TestSetModifier<S: StepperMut, T> {
    stepper: S,
    value: S::Value,
    test: T,
}

impl<S: StepperMut, T: Test<S>> TestSetModifier<S, T> {
    pub fn new(stepper: S, value: S::Value, test: T) -> Self {
        Self {
            stepper,
            value,
            test,
        }
    }

    pub fn set_value(&mut self, value: S::Value) {
        self.value = value;
    }

    pub fn test_ref(&self) -> &T {
        &self.test
    }

    pub fn into_stepper(self) -> S {
        self.stepper
    }
}

impl<S: StepperMut, T: Test<S>> Modifier for TestSetModifier<S, T> {
    type Stepper = S;

    fn stepper(&self) -> &S {
        &self.stepper
    }

    fn stepper_mut(&mut self) -> &mut S {
        &mut self.stepper
    }

    fn value(&self) -> S::Value {
        self.value
    }

    #[inline]
    fn accepts(&self) -> bool {
        self.test.test(&self.stepper)
    }
}

/// Writes its value inside the grid where every test passes
///
/// Cells outside the grid extent are always refused, so a modifier with
/// no tests behaves like a bounds-checked [`SetModifier`].
pub struct MultiTestSetModifier<'a, S: StepperMut> {
    stepper: S,
    value: S::Value,
    tests: MultiTest<'a, S>,
}

impl<'a, S: StepperMut> MultiTestSetModifier<'a, S> {
    pub fn new(stepper: S, value: S::Value) -> Self {
        Self::with_tests(stepper, value, MultiTest::new())
    }

    pub fn with_tests(stepper: S, value: S::Value, tests: MultiTest<'a, S>) -> Self {
        Self {
            stepper,
            value,
            tests,
        }
    }

    /// Append a test
    ///
    /// # Returns
    ///
    /// `false` if the test collection is full.
    pub fn add_test<T: Test<S> + 'a>(&mut self, test: T) -> bool {
        self.tests.add_test(test)
    }

    pub fn clear_tests(&mut self) {
        self.tests.clear_tests();
    }

    /// Evaluate the tests at the cursor without the bounds check
    pub fn do_tests(&self) -> bool {
        self.tests.test(&self.stepper)
    }

    pub fn tests(&self) -> &MultiTest<'a, S> {
        &self.tests
    }

    pub fn set_value(&mut self, value: S::Value) {
        self.value = value;
    }

    pub fn into_stepper(self) -> S {
        self.stepper
    }
}

impl<S: StepperMut> Modifier for MultiTestSetModifier<'_, S> {
    type Stepper = S;

    fn stepper(&self) -> &S {
        &self.stepper
    }

    fn stepper_mut(&mut self) -> &mut S {
        &mut self.stepper
    }

    fn value(&self) -> S::Value {
        self.value
    }

    #[inline]
    fn accepts(&self) -> bool {
        self.stepper.is_in() && self.do_tests()
    }
}

/// Wrapper writing each cell at most once
///
/// Lets rasterizers that cover a cell several times (overlapping quads,
/// caps, band lines) report the number of distinct cells written.
pub struct VisitOnce<'m, M: Modifier> {
    inner: &'m mut M,
    written: HashSet<(i32, i32, i32)>,
}

impl<'m, M: Modifier> VisitOnce<'m, M> {
    pub fn new(inner: &'m mut M) -> Self {
        Self {
            inner,
            written: HashSet::new(),
        }
    }

    /// Number of distinct cells written so far
    pub fn count(&self) -> usize {
        self.written.len()
    }
}

impl<M: Modifier> Modifier for VisitOnce<'_, M> {
    type Stepper = M::Stepper;

    fn stepper(&self) -> &M::Stepper {
        self.inner.stepper()
    }

    fn stepper_mut(&mut self) -> &mut M::Stepper {
        self.inner.stepper_mut()
    }

    fn value(&self) -> ValueOf<M> {
        self.inner.value()
    }

    fn accepts(&self) -> bool {
        !self.written.contains(&self.inner.stepper().grid_position()) && self.inner.accepts()
    }

    fn write(&mut self) {
        self.written.insert(self.inner.stepper().grid_position());
        self.inner.write();
    }
}
