//! Regression test parameters and operations

use std::fmt::Debug;
use voxseg_core::{Plane, Volume};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results against expected values (default)
    #[default]
    Compare,
    /// Also print grids that are compared, for visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the index of the current comparison, the mode
/// and every failure recorded so far. Comparisons never panic; the test
/// asserts on [`cleanup`](Self::cleanup) at the end so that one run
/// reports all mismatches.
pub struct RegParams {
    /// Name of the test (e.g., "seedfill")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// Installs the test logger and reads the mode from `REGTEST_MODE`.
    pub fn new(test_name: &str) -> Self {
        crate::init_logger();
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        // NaN never matches
        if diff > delta || diff.is_nan() {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare two cell counts exactly
    pub fn compare_counts(&mut self, expected: usize, actual: usize) -> bool {
        self.index += 1;
        if expected != actual {
            self.fail(format!(
                "Failure in {}_reg: count comparison for index {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Record a boolean check
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if !condition {
            self.fail(format!(
                "Failure in {}_reg: check for index {} - {}",
                self.test_name, self.index, what
            ));
        }
        condition
    }

    /// Compare two volumes cell by cell, margin excluded
    ///
    /// # Returns
    ///
    /// `true` if extents and all interior cells are equal.
    pub fn compare_volumes<T>(&mut self, expected: &Volume<T>, actual: &Volume<T>) -> bool
    where
        T: Copy + PartialEq + Debug,
    {
        self.index += 1;

        if !expected.same_size(actual) {
            self.fail(format!(
                "Failure in {}_reg: volume comparison for index {} - dimension mismatch {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.dimensions(),
                actual.dimensions()
            ));
            return false;
        }

        let (xs, ys, zs) = expected.dimensions();
        for z in 0..zs as i32 {
            for y in 0..ys as i32 {
                for x in 0..xs as i32 {
                    let (e, a) = (expected.at(x, y, z), actual.at(x, y, z));
                    if e != a {
                        self.fail(format!(
                            "Failure in {}_reg: volume comparison for index {} - mismatch at ({}, {}, {}): {:?} vs {:?}",
                            self.test_name, self.index, x, y, z, e, a
                        ));
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Compare two planes cell by cell, margin excluded
    pub fn compare_planes<T>(&mut self, expected: &Plane<T>, actual: &Plane<T>) -> bool
    where
        T: Copy + PartialEq + Debug + Into<i64>,
    {
        self.index += 1;

        if !expected.same_size(actual) {
            self.fail(format!(
                "Failure in {}_reg: plane comparison for index {} - dimension mismatch {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.dimensions(),
                actual.dimensions()
            ));
            return false;
        }

        let (xs, ys) = expected.dimensions();
        for y in 0..ys as i32 {
            for x in 0..xs as i32 {
                let (e, a) = (expected.at(x, y), actual.at(x, y));
                if e != a {
                    if self.display() {
                        eprintln!("expected:\n{}", crate::render_plane(expected));
                        eprintln!("actual:\n{}", crate::render_plane(actual));
                    }
                    self.fail(format!(
                        "Failure in {}_reg: plane comparison for index {} - mismatch at ({}, {}): {:?} vs {:?}",
                        self.test_name, self.index, x, y, e, a
                    ));
                    return false;
                }
            }
        }
        true
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
