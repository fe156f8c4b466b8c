//! Cell predicates
//!
//! A [`Test`] looks at the cell under a stepper and answers yes or no.
//! Tests hold only their comparison parameters, never the grid, so one
//! test value can be shared by several traversals.

use voxseg_core::{JoinedStepper, Stepper};

/// Predicate evaluated at a stepper's current position
///
/// Any `Fn(&S) -> bool` closure is a test.
pub trait Test<S: ?Sized> {
    fn test(&self, stepper: &S) -> bool;
}

impl<S: ?Sized, F> Test<S> for F
where
    F: Fn(&S) -> bool,
{
    #[inline]
    fn test(&self, stepper: &S) -> bool {
        self(stepper)
    }
}

/// True while the cursor is inside the grid extent
#[derive(Debug, Clone, Copy, Default)]
pub struct FillTest;

impl<S: Stepper + ?Sized> Test<S> for FillTest {
    #[inline]
    fn test(&self, stepper: &S) -> bool {
        stepper.is_in()
    }
}

/// True if the cell does not yet hold the given label
///
/// The usual termination test for a seed fill writing that label.
#[derive(Debug, Clone, Copy)]
pub struct NotDoneTest<V>(pub V);

impl<V: Copy + PartialEq, S: Stepper<Value = V> + ?Sized> Test<S> for NotDoneTest<V> {
    #[inline]
    fn test(&self, stepper: &S) -> bool {
        stepper.get() != self.0
    }
}

/// True if the cell holds exactly the mask label
#[derive(Debug, Clone, Copy)]
pub struct MaskTest<V>(pub V);

impl<V: Copy + PartialEq, S: Stepper<Value = V> + ?Sized> Test<S> for MaskTest<V> {
    #[inline]
    fn test(&self, stepper: &S) -> bool {
        stepper.get() == self.0
    }
}

/// True if the cell holds the mask label or is blank
///
/// Blank is `V::default()`, which is 0 for label grids.
#[derive(Debug, Clone, Copy)]
pub struct MaskOrZeroTest<V>(pub V);

impl<V: Copy + PartialEq + Default, S: Stepper<Value = V> + ?Sized> Test<S> for MaskOrZeroTest<V> {
    #[inline]
    fn test(&self, stepper: &S) -> bool {
        let v = stepper.get();
        v == self.0 || v == V::default()
    }
}

/// True if the cell value lies in `[min, max]`, both inclusive
#[derive(Debug, Clone, Copy)]
pub struct RangeTest<V> {
    pub min: V,
    pub max: V,
}

impl<V> RangeTest<V> {
    pub fn new(min: V, max: V) -> Self {
        Self { min, max }
    }
}

impl<V: Copy + PartialOrd, S: Stepper<Value = V> + ?Sized> Test<S> for RangeTest<V> {
    #[inline]
    fn test(&self, stepper: &S) -> bool {
        let v = stepper.get();
        v >= self.min && v <= self.max
    }
}

/// Evaluates the wrapped test on the secondary grid of a joined stepper
///
/// ```
/// use voxseg_core::{DensityVolume, JoinedStepper, RegionVolume, SteppingMode, VolumeStepper};
/// use voxseg_region::{RangeTest, Secondary, Test};
///
/// let mut region = RegionVolume::new(4, 4, 4, 0).unwrap();
/// let mut density = DensityVolume::new(4, 4, 4, 0).unwrap();
/// density.set_at(0, 0, 0, 120);
/// let joined = JoinedStepper::new(
///     VolumeStepper::new(&mut region, SteppingMode::Volume),
///     VolumeStepper::new(&density, SteppingMode::Volume),
/// )
/// .unwrap();
/// assert!(Secondary(RangeTest::new(100, 200)).test(&joined));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Secondary<T>(pub T);

impl<P, S, T> Test<JoinedStepper<P, S>> for Secondary<T>
where
    P: Stepper,
    S: Stepper,
    T: Test<S>,
{
    #[inline]
    fn test(&self, stepper: &JoinedStepper<P, S>) -> bool {
        self.0.test(stepper.secondary())
    }
}

/// Default number of tests a [`MultiTest`] accepts
pub const DEFAULT_MAX_TESTS: usize = 10;

/// Logical AND over an ordered list of tests
///
/// Evaluation stops at the first failing test. An empty list passes.
/// By default at most [`DEFAULT_MAX_TESTS`] tests can be added; use
/// [`MultiTest::unbounded`] to lift the limit.
pub struct MultiTest<'a, S: ?Sized> {
    tests: Vec<Box<dyn Test<S> + 'a>>,
    limit: Option<usize>,
}

impl<'a, S: ?Sized> MultiTest<'a, S> {
    /// Create an empty collection limited to [`DEFAULT_MAX_TESTS`]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_TESTS)
    }

    /// Create an empty collection holding at most `limit` tests
    pub fn with_limit(limit: usize) -> Self {
        Self {
            tests: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Create an empty collection with no limit
    pub fn unbounded() -> Self {
        Self {
            tests: Vec::new(),
            limit: None,
        }
    }

    /// Append a test
    ///
    /// # Returns
    ///
    /// `false` if the collection is full; the test is not added.
    pub fn add_test<T: Test<S> + 'a>(&mut self, test: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.tests.push(Box::new(test));
        true
    }

    pub fn clear_tests(&mut self) {
        self.tests.clear();
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.tests.len() >= limit)
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

impl<S: ?Sized> Default for MultiTest<'_, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> Test<S> for MultiTest<'_, S> {
    fn test(&self, stepper: &S) -> bool {
        self.tests.iter().all(|t| t.test(stepper))
    }
}

impl<S: ?Sized> std::fmt::Debug for MultiTest<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiTest")
            .field("len", &self.tests.len())
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use voxseg_core::{PlaneStepper, RegionPlane};

    fn plane_with(values: &[u16]) -> RegionPlane {
        RegionPlane::from_rows(values.len() as u32, 1, 1, values).unwrap()
    }

    #[test]
    fn test_label_tests() {
        let plane = plane_with(&[0, 3, 5]);
        let mut s = PlaneStepper::new(&plane);

        s.set_position_2d(0, 0);
        assert!(NotDoneTest(3).test(&s));
        assert!(!MaskTest(3).test(&s));
        assert!(MaskOrZeroTest(3).test(&s));

        s.set_position_2d(1, 0);
        assert!(!NotDoneTest(3).test(&s));
        assert!(MaskTest(3).test(&s));
        assert!(MaskOrZeroTest(3).test(&s));

        s.set_position_2d(2, 0);
        assert!(!MaskOrZeroTest(3).test(&s));
        assert!(RangeTest::new(3, 5).test(&s));
        assert!(!RangeTest::new(0, 4).test(&s));
    }

    #[test]
    fn test_fill_test_bounds() {
        let plane = plane_with(&[1, 1]);
        let mut s = PlaneStepper::new(&plane);
        s.set_position_2d(1, 0);
        assert!(FillTest.test(&s));
        s.set_position_2d(2, 0);
        assert!(!FillTest.test(&s));
    }

    #[test]
    fn test_multi_test_capacity() {
        let mut mt: MultiTest<'_, PlaneStepper<&RegionPlane>> = MultiTest::new();
        for _ in 0..DEFAULT_MAX_TESTS {
            assert!(mt.add_test(FillTest));
        }
        assert!(mt.is_full());
        assert!(!mt.add_test(FillTest));
        assert_eq!(mt.len(), DEFAULT_MAX_TESTS);

        mt.clear_tests();
        assert!(mt.is_empty());

        let mut unbounded: MultiTest<'_, PlaneStepper<&RegionPlane>> = MultiTest::unbounded();
        for _ in 0..50 {
            assert!(unbounded.add_test(FillTest));
        }
    }

    #[test]
    fn test_multi_test_short_circuit() {
        let plane = plane_with(&[2]);
        let s = PlaneStepper::new(&plane);
        let calls = Cell::new(0);

        let mut mt: MultiTest<'_, PlaneStepper<&RegionPlane>> = MultiTest::new();
        mt.add_test(MaskTest(7u16));
        mt.add_test(|_: &PlaneStepper<&RegionPlane>| {
            calls.set(calls.get() + 1);
            true
        });
        assert!(!mt.test(&s));
        assert_eq!(calls.get(), 0);

        let mut pass: MultiTest<'_, PlaneStepper<&RegionPlane>> = MultiTest::new();
        pass.add_test(MaskTest(2u16));
        pass.add_test(RangeTest::new(0u16, 10));
        assert!(pass.test(&s));

        let empty: MultiTest<'_, PlaneStepper<&RegionPlane>> = MultiTest::new();
        assert!(empty.test(&s));
    }
}
