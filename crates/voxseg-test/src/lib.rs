//! voxseg-test - Regression test framework for voxseg
//!
//! Every `tests/*_reg.rs` file in the workspace drives its comparisons
//! through [`RegParams`] and asserts on [`RegParams::cleanup`] at the end.
//! The crate also provides the synthetic grids those tests share.
//!
//! # Usage
//!
//! ```ignore
//! use voxseg_test::RegParams;
//!
//! let mut rp = RegParams::new("seedfill");
//! rp.compare_values(25.0, count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"
//! - `RUST_LOG`: Log level of the test logger, `warn` by default

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use voxseg_core::{DensityPixel, DensityVolume, Plane, RegionPixel, RegionPlane, RegionVolume};

/// Install the test logger once per process
///
/// Later calls are ignored, so every test can call this freely.
pub fn init_logger() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init();
}

/// Build a density volume of equal-width plateaus along x
///
/// Plateau `i` covers `x` in `[i * x_size / n, (i + 1) * x_size / n)` and
/// holds `levels[i]`. The margin is set to the first level so filters
/// reading the ring see plausible values.
///
/// # Errors
///
/// Returns an error if `levels` is empty or there are more levels than
/// columns.
pub fn step_volume(
    x_size: u32,
    y_size: u32,
    z_size: u32,
    levels: &[DensityPixel],
) -> TestResult<DensityVolume> {
    let Some(&first) = levels.first() else {
        return Err(TestError::InvalidFixture("no levels given".into()));
    };
    if levels.len() > x_size as usize {
        return Err(TestError::InvalidFixture(format!(
            "{} levels do not fit in {} columns",
            levels.len(),
            x_size
        )));
    }
    let mut vol = DensityVolume::new_with_value(x_size, y_size, z_size, 1, first)?;
    let n = levels.len();
    for z in 0..z_size as i32 {
        for y in 0..y_size as i32 {
            for (x, cell) in vol.row_mut(y, z).iter_mut().enumerate() {
                *cell = levels[x * n / x_size as usize];
            }
        }
    }
    Ok(vol)
}

/// Build a label plane with `label` on cells where `x + y` is even
pub fn checkerboard_plane(x_size: u32, y_size: u32, label: RegionPixel) -> TestResult<RegionPlane> {
    let mut plane = RegionPlane::new(x_size, y_size, 1)?;
    for y in 0..y_size as i32 {
        for (x, cell) in plane.row_mut(y).iter_mut().enumerate() {
            if (x as i32 + y) % 2 == 0 {
                *cell = label;
            }
        }
    }
    Ok(plane)
}

/// Empty label volume with the extent and margin of `density`
pub fn region_volume_like(density: &DensityVolume) -> RegionVolume {
    RegionVolume::new_like(density)
}

/// Render a plane as text, one character per cell
///
/// Labels 0 to 9 print as digits, larger values as `#`.
pub fn render_plane<T>(plane: &Plane<T>) -> String
where
    T: Copy + Into<i64>,
{
    let (xs, ys) = plane.dimensions();
    let mut out = String::with_capacity((xs as usize + 1) * ys as usize);
    for y in 0..ys as i32 {
        for &v in plane.row(y) {
            let v: i64 = v.into();
            out.push(match v {
                0..=9 => char::from(b'0' + v as u8),
                _ => '#',
            });
        }
        out.push('\n');
    }
    out
}
