//! Segmenters triggered by sampling strokes

use crate::error::InteractResult;
use crate::training::TrainingSet;
use voxseg_cluster::{
    ClusterOutcome, EmOptions, FuzzyCMeans, GaussianMixture, RegionRegistry,
};
use voxseg_core::{CancelToken, DensityPixel, DensityVolume, RegionPixel, RegionVolume};
use voxseg_region::{RegionError, ThresholdOptions, Thresholding};

/// Segmentation trained from positive and negative samples
pub trait Segmenter<S> {
    /// Relabel `region`
    ///
    /// # Returns
    ///
    /// The number of voxels labeled.
    fn segment(
        &mut self,
        positive: &TrainingSet<S>,
        negative: &TrainingSet<S>,
        density: &DensityVolume,
        region: &mut RegionVolume,
    ) -> InteractResult<usize>;
}

/// Options for [`RangeSegmenter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSegmenterOptions {
    /// Label written inside the derived window
    pub region_id: RegionPixel,
    /// Half-width of the window in standard deviations
    pub k_sigma: f64,
    /// Whether voxels outside the window are cleared to 0
    pub clear: bool,
}

impl Default for RangeSegmenterOptions {
    fn default() -> Self {
        Self {
            region_id: 1,
            k_sigma: 2.0,
            clear: false,
        }
    }
}

impl RangeSegmenterOptions {
    pub fn with_region_id(mut self, region_id: RegionPixel) -> Self {
        self.region_id = region_id;
        self
    }

    pub fn with_k_sigma(mut self, k_sigma: f64) -> Self {
        self.k_sigma = k_sigma;
        self
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }
}

/// Thresholds a density window learned from the samples
///
/// The window is `mean ± k·σ` of the positive samples. When negative
/// samples exist, the window side facing their mean is cut at the
/// midpoint between the two means.
#[derive(Debug, Clone, Default)]
pub struct RangeSegmenter {
    options: RangeSegmenterOptions,
    cancel: Option<CancelToken>,
    last_window: Option<(DensityPixel, DensityPixel)>,
}

impl RangeSegmenter {
    pub fn new(options: RangeSegmenterOptions) -> Self {
        Self {
            options,
            cancel: None,
            last_window: None,
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &RangeSegmenterOptions {
        &self.options
    }

    /// Window applied by the last segmentation
    pub fn last_window(&self) -> Option<(DensityPixel, DensityPixel)> {
        self.last_window
    }

    /// Density window for the given samples, `None` if it is empty
    pub fn window<S: Copy + Into<f64>>(
        &self,
        positive: &TrainingSet<S>,
        negative: &TrainingSet<S>,
    ) -> Option<(DensityPixel, DensityPixel)> {
        let (mean, std) = positive.mean_std()?;
        let spread = self.options.k_sigma * std;
        let (mut lo, mut hi) = (mean - spread, mean + spread);
        if let Some((neg, _)) = negative.mean_std() {
            let mid = (mean + neg) * 0.5;
            if neg > mean {
                hi = hi.min(mid);
            } else if neg < mean {
                lo = lo.max(mid);
            } else {
                log::warn!("negative samples share the positive mean {:.2}", mean);
            }
        }
        let min = lo.ceil().clamp(f64::from(DensityPixel::MIN), f64::from(DensityPixel::MAX));
        let max = hi.floor().clamp(f64::from(DensityPixel::MIN), f64::from(DensityPixel::MAX));
        (min <= max).then_some((min as DensityPixel, max as DensityPixel))
    }
}

impl<S: Copy + Into<f64>> Segmenter<S> for RangeSegmenter {
    fn segment(
        &mut self,
        positive: &TrainingSet<S>,
        negative: &TrainingSet<S>,
        density: &DensityVolume,
        region: &mut RegionVolume,
    ) -> InteractResult<usize> {
        self.last_window = self.window(positive, negative);
        let Some((min, max)) = self.last_window else {
            log::debug!("no density window from {} samples", positive.len());
            return Ok(0);
        };
        let mut options = ThresholdOptions::new(min, max).with_color(self.options.region_id);
        if self.options.clear {
            options = options.with_clear(0);
        }
        let labeled = Thresholding::new(options)?.apply(density, region, self.cancel.as_ref())?;
        log::debug!("window [{}, {}] labeled {} voxels", min, max, labeled);
        Ok(labeled)
    }
}

/// Options for [`EmSegmenter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmSegmenterOptions {
    /// Components of each mixture
    pub components: usize,
    /// Label written to accepted voxels
    pub region_id: RegionPixel,
    /// Normalized probability a single model must reach
    pub cutoff: f64,
    /// Whether rejected voxels are cleared to 0
    pub clear: bool,
}

impl Default for EmSegmenterOptions {
    fn default() -> Self {
        Self {
            components: 4,
            region_id: 1,
            cutoff: 0.05,
            clear: true,
        }
    }
}

impl EmSegmenterOptions {
    pub fn with_components(mut self, components: usize) -> Self {
        self.components = components;
        self
    }

    pub fn with_region_id(mut self, region_id: RegionPixel) -> Self {
        self.region_id = region_id;
        self
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }
}

/// A mixture with its peak over the density range
#[derive(Debug, Clone)]
struct Model {
    mixture: GaussianMixture,
    peak: f64,
}

impl Model {
    fn train<S: Copy + Into<f64>>(
        set: &TrainingSet<S>,
        options: &EmOptions,
    ) -> InteractResult<Option<Self>> {
        if set.is_empty() {
            return Ok(None);
        }
        let samples: Vec<f64> = set.iter().map(|&s| s.into()).collect();
        let mixture = GaussianMixture::fit(&samples, options)?;
        let peak = (DensityPixel::MIN..=DensityPixel::MAX)
            .map(|v| mixture.density(f64::from(v)))
            .fold(f64::MIN_POSITIVE, f64::max);
        Ok(Some(Self { mixture, peak }))
    }

    /// Density at `v` scaled so the peak is 1
    fn probability(&self, v: DensityPixel) -> f64 {
        self.mixture.density(f64::from(v)) / self.peak
    }
}

/// Labels densities that a Gaussian mixture of the samples accepts
///
/// A mixture is fitted to each non-empty training set and normalized by
/// its peak. With both models a density is accepted when the positive
/// probability reaches the cutoff and beats the negative one. A positive
/// model alone accepts at or above the cutoff; a negative model alone
/// accepts below it.
#[derive(Debug, Clone, Default)]
pub struct EmSegmenter {
    options: EmSegmenterOptions,
    cancel: Option<CancelToken>,
    positive: Option<Model>,
    negative: Option<Model>,
}

impl EmSegmenter {
    pub fn new(options: EmSegmenterOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &EmSegmenterOptions {
        &self.options
    }

    pub fn positive_model(&self) -> Option<&GaussianMixture> {
        self.positive.as_ref().map(|m| &m.mixture)
    }

    pub fn negative_model(&self) -> Option<&GaussianMixture> {
        self.negative.as_ref().map(|m| &m.mixture)
    }

    /// Fit both models; an empty set leaves its model out
    ///
    /// # Errors
    ///
    /// Returns an error if the mixture options are invalid.
    pub fn train<S: Copy + Into<f64>>(
        &mut self,
        positive: &TrainingSet<S>,
        negative: &TrainingSet<S>,
    ) -> InteractResult<()> {
        let options = EmOptions::default().with_components(self.options.components);
        self.positive = Model::train(positive, &options)?;
        self.negative = Model::train(negative, &options)?;
        log::debug!(
            "trained EM models from {} positive and {} negative samples",
            positive.len(),
            negative.len()
        );
        Ok(())
    }

    /// Whether the trained models accept density `v`, `None` untrained
    pub fn accepts(&self, v: DensityPixel) -> Option<bool> {
        let cutoff = self.options.cutoff;
        match (&self.positive, &self.negative) {
            (Some(p), Some(n)) => {
                let pp = p.probability(v);
                Some(pp >= cutoff && pp > n.probability(v))
            }
            (Some(p), None) => Some(p.probability(v) >= cutoff),
            (None, Some(n)) => Some(n.probability(v) < cutoff),
            (None, None) => None,
        }
    }

    /// Label `region` from the trained models
    ///
    /// Labels go into a copy that replaces `region` once every slice is
    /// done. Returns the number of voxels labeled, 0 without a model.
    pub fn apply(
        &self,
        density: &DensityVolume,
        region: &mut RegionVolume,
    ) -> InteractResult<usize> {
        density.check_same_size(region)?;
        let Some((min, max)) = density.min_max() else {
            return Ok(0);
        };
        let table: Option<Vec<bool>> = (min..=max).map(|v| self.accepts(v)).collect();
        let Some(table) = table else {
            log::debug!("no EM model trained");
            return Ok(0);
        };

        let mut labeled = region.clone();
        let mut count = 0;
        let (_, ys, zs) = density.dimensions();
        for z in 0..zs as i32 {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(RegionError::Cancelled.into());
            }
            for y in 0..ys as i32 {
                for (&d, cell) in density.row(y, z).iter().zip(labeled.row_mut(y, z)) {
                    if table[(i32::from(d) - i32::from(min)) as usize] {
                        *cell = self.options.region_id;
                        count += 1;
                    } else if self.options.clear {
                        *cell = 0;
                    }
                }
            }
        }
        *region = labeled;
        log::debug!("EM labeled {} voxels with {}", count, self.options.region_id);
        Ok(count)
    }
}

impl<S: Copy + Into<f64>> Segmenter<S> for EmSegmenter {
    fn segment(
        &mut self,
        positive: &TrainingSet<S>,
        negative: &TrainingSet<S>,
        density: &DensityVolume,
        region: &mut RegionVolume,
    ) -> InteractResult<usize> {
        self.train(positive, negative)?;
        self.apply(density, region)
    }
}

/// Runs fuzzy c-means on the whole volume, ignoring the samples
#[derive(Debug)]
pub struct ClusteringSegmenter {
    fcm: FuzzyCMeans,
    registry: RegionRegistry,
    last_outcome: Option<ClusterOutcome>,
}

impl ClusteringSegmenter {
    pub fn new(fcm: FuzzyCMeans, registry: RegionRegistry) -> Self {
        Self {
            fcm,
            registry,
            last_outcome: None,
        }
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RegionRegistry {
        &mut self.registry
    }

    pub fn last_outcome(&self) -> Option<&ClusterOutcome> {
        self.last_outcome.as_ref()
    }
}

impl<S> Segmenter<S> for ClusteringSegmenter {
    fn segment(
        &mut self,
        _positive: &TrainingSet<S>,
        _negative: &TrainingSet<S>,
        density: &DensityVolume,
        region: &mut RegionVolume,
    ) -> InteractResult<usize> {
        // every voxel is relabeled, so earlier automatic ids are free again
        self.registry.release_all_automatic();
        let outcome = self.fcm.execute(density, region, &mut self.registry)?;
        self.last_outcome = Some(outcome);
        Ok(density.voxel_count())
    }
}
