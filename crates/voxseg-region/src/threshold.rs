//! Window thresholding
//!
//! Labels every voxel whose density falls inside `[min, max]`. Voxels
//! outside the window keep their label unless clearing is enabled. The
//! pass labels a copy of the region slice by slice, polling its cancel
//! token before each slice, and replaces the region only once every slice
//! is done.

use crate::error::{RegionError, RegionResult};
use voxseg_core::{CancelToken, DensityPixel, DensityVolume, RegionPixel, RegionVolume};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Options for window thresholding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdOptions {
    /// Lowest density inside the window
    pub min: DensityPixel,
    /// Highest density inside the window
    pub max: DensityPixel,
    /// Label written inside the window
    pub color: RegionPixel,
    /// Whether voxels outside the window are overwritten
    pub clear: bool,
    /// Label written outside the window when `clear` is set
    pub clear_color: RegionPixel,
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        Self {
            min: 0,
            max: DensityPixel::MAX,
            color: 1,
            clear: false,
            clear_color: 0,
        }
    }
}

impl ThresholdOptions {
    pub fn new(min: DensityPixel, max: DensityPixel) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: RegionPixel) -> Self {
        self.color = color;
        self
    }

    /// Overwrite voxels outside the window with `clear_color`
    pub fn with_clear(mut self, clear_color: RegionPixel) -> Self {
        self.clear = true;
        self.clear_color = clear_color;
        self
    }
}

/// Window thresholding pass
#[derive(Debug, Clone)]
pub struct Thresholding {
    options: ThresholdOptions,
}

impl Thresholding {
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidParameters`] if `min > max`.
    pub fn new(options: ThresholdOptions) -> RegionResult<Self> {
        if options.min > options.max {
            return Err(RegionError::InvalidParameters(format!(
                "empty threshold window [{}, {}]",
                options.min, options.max
            )));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &ThresholdOptions {
        &self.options
    }

    /// Label `region` from `density`
    ///
    /// # Returns
    ///
    /// The number of voxels inside the window.
    ///
    /// # Errors
    ///
    /// Returns an error if the grids differ in extent, or
    /// [`RegionError::Cancelled`] if `cancel` fires. `region` is left
    /// unchanged on error.
    pub fn apply(
        &self,
        density: &DensityVolume,
        region: &mut RegionVolume,
        cancel: Option<&CancelToken>,
    ) -> RegionResult<usize> {
        self.apply_until(density, region, |_| {
            cancel.is_some_and(CancelToken::is_cancelled)
        })
    }

    /// [`apply`](Self::apply) with `stop(z)` polled before slice `z`
    fn apply_until<F>(
        &self,
        density: &DensityVolume,
        region: &mut RegionVolume,
        stop: F,
    ) -> RegionResult<usize>
    where
        F: Fn(i32) -> bool + Sync,
    {
        region.check_same_size(density)?;
        let opts = self.options;
        let layout = region.row_layout();
        let slice_len = layout.slice_len();
        if slice_len == 0 {
            return Ok(0);
        }
        let mut labeled = region.clone();

        let label_slice = |(index, slice): (usize, &mut [RegionPixel])| -> RegionResult<usize> {
            let Some(z) = layout.slice_z(index) else {
                return Ok(0);
            };
            if stop(z) {
                return Err(RegionError::Cancelled);
            }
            let mut inside = 0;
            for (r, row) in slice.chunks_mut(layout.stride()).enumerate() {
                let Some(y) = layout.slice_row_y(r) else {
                    continue;
                };
                let labels = &mut row[layout.interior()];
                for (label, &d) in labels.iter_mut().zip(density.row(y, z)) {
                    if d >= opts.min && d <= opts.max {
                        *label = opts.color;
                        inside += 1;
                    } else if opts.clear {
                        *label = opts.clear_color;
                    }
                }
            }
            Ok(inside)
        };

        #[cfg(feature = "rayon")]
        let counts: Vec<usize> = labeled
            .data_mut()
            .par_chunks_mut(slice_len)
            .enumerate()
            .map(label_slice)
            .collect::<RegionResult<_>>()?;

        #[cfg(not(feature = "rayon"))]
        let counts: Vec<usize> = labeled
            .data_mut()
            .chunks_mut(slice_len)
            .enumerate()
            .map(label_slice)
            .collect::<RegionResult<_>>()?;

        *region = labeled;
        let inside: usize = counts.iter().sum();
        log::debug!(
            "threshold [{}, {}] -> {}: {} voxels",
            opts.min,
            opts.max,
            opts.color,
            inside
        );
        Ok(inside)
    }
}
