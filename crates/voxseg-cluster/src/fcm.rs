//! Fuzzy c-means clustering of density histograms
//!
//! The iteration runs on the histogram of the volume rather than on the
//! voxels: every bin is a sample weighted by its count, and each bin row
//! of the membership matrix holds one value per cluster.
//!
//! One iteration:
//!
//! 1. Raise memberships to the fuzziness weight `m`
//! 2. Move each center to the weighted mean of the bins
//! 3. Recompute memberships from center distances,
//!    `u_ik = 1 / Σ_j (d_ik / d_ij)^(2 / (m - 1))`
//! 4. Evaluate the objective `J = Σ count · u^m · d²`
//!
//! The loop stops when the relative change of `J` falls under
//! `min_change`, or at the iteration cap.
//!
//! # Examples
//!
//! ```
//! use voxseg_cluster::{FcmOptions, FuzzyCMeans, RegionRegistry};
//! use voxseg_core::{DensityVolume, RegionVolume};
//!
//! let mut density = DensityVolume::new(6, 2, 2, 0).unwrap();
//! for z in 0..2 {
//!     for y in 0..2 {
//!         for (x, v) in density.row_mut(y, z).iter_mut().enumerate() {
//!             *v = if x < 3 { 10 } else { 90 };
//!         }
//!     }
//! }
//! let mut region = RegionVolume::new_like(&density);
//! let mut registry = RegionRegistry::default();
//!
//! let fcm = FuzzyCMeans::new(FcmOptions::default().with_clusters(2)).unwrap();
//! let outcome = fcm.execute(&density, &mut region, &mut registry).unwrap();
//! assert_eq!(outcome.effective_clusters, 2);
//! assert_eq!(region.at(0, 0, 0), 1);
//! assert_eq!(region.at(5, 1, 1), 2);
//! ```

use crate::error::{ClusterError, ClusterResult};
use crate::estimate::{ClusterCountEstimator, PartitionCoefficientEstimator};
use crate::registry::RegionRegistry;
use crate::segment::{segment_with_thresholds, segment_within_label};
use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use std::ops::RangeInclusive;
use voxseg_core::{
    CancelToken, DensityPixel, DensityVolume, Histogram, RegionPixel, RegionVolume,
};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Default fuzziness weight
pub const DEFAULT_WEIGHT: f64 = 2.0;
/// Default relative objective change that ends the iteration
pub const DEFAULT_MIN_CHANGE: f64 = 1.0e-6;
/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
/// Default distance under which two centers are merged
pub const DEFAULT_MERGE_DISTANCE: f64 = 0.5;

/// Number of clusters to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterCount {
    /// Exactly this many clusters
    Fixed(usize),
    /// Let the estimator decide
    #[default]
    Auto,
}

/// Options for [`FuzzyCMeans`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FcmOptions {
    pub clusters: ClusterCount,
    /// Fuzziness weight `m`, must exceed 1
    pub weight: f64,
    pub min_change: f64,
    pub max_iterations: usize,
    /// Centers closer than this are treated as one cluster
    pub merge_distance: f64,
    /// Seed of the membership initialization
    pub seed: u64,
    /// Histogram range; the observed range of the volume when `None`
    pub range: Option<(DensityPixel, DensityPixel)>,
}

impl Default for FcmOptions {
    fn default() -> Self {
        Self {
            clusters: ClusterCount::Auto,
            weight: DEFAULT_WEIGHT,
            min_change: DEFAULT_MIN_CHANGE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            merge_distance: DEFAULT_MERGE_DISTANCE,
            seed: 0,
            range: None,
        }
    }
}

impl FcmOptions {
    pub fn with_clusters(mut self, k: usize) -> Self {
        self.clusters = ClusterCount::Fixed(k);
        self
    }

    pub fn with_auto_clusters(mut self) -> Self {
        self.clusters = ClusterCount::Auto;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_min_change(mut self, min_change: f64) -> Self {
        self.min_change = min_change;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_merge_distance(mut self, merge_distance: f64) -> Self {
        self.merge_distance = merge_distance;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_range(mut self, min: DensityPixel, max: DensityPixel) -> Self {
        self.range = Some((min, max));
        self
    }
}

/// Result of one clustering run for a fixed cluster count
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterState {
    k: usize,
    centers: Vec<f64>,
    /// Row-major, one row of `k` values per histogram bin
    membership: Vec<f64>,
    iterations: usize,
    converged: bool,
    objective_history: Vec<f64>,
    partition_coefficient: f64,
}

impl ClusterState {
    pub fn cluster_count(&self) -> usize {
        self.k
    }

    pub fn bin_count(&self) -> usize {
        self.membership.len() / self.k.max(1)
    }

    /// Cluster centers in density units, in cluster order
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Memberships of one histogram bin, `None` past the last bin
    pub fn membership_row(&self, bin: usize) -> Option<&[f64]> {
        let start = bin.checked_mul(self.k)?;
        self.membership.get(start..start + self.k)
    }

    /// Whether every bin row lies in `[0, 1]` and sums to 1
    pub fn check_membership(&self) -> bool {
        membership_is_normalized(&self.membership, self.k)
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// `false` if the iteration cap was hit
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Objective after each iteration
    pub fn objective_history(&self) -> &[f64] {
        &self.objective_history
    }

    /// Normalized partition coefficient
    ///
    /// `(P - 1/K) / (1 - 1/K + 0.001)` where `P` is the count-weighted
    /// mean of `Σ u²` over the bins. 0 for a single cluster, close to 1
    /// for a crisp partition.
    pub fn partition_coefficient(&self) -> f64 {
        self.partition_coefficient
    }
}

/// Thresholds derived from a clustering, before any relabeling
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterFit {
    pub state: ClusterState,
    /// Sorted centers after merging near-duplicates
    pub centers: Vec<f64>,
    /// Midpoints between adjacent merged centers
    pub thresholds: Vec<f64>,
}

impl ClusterFit {
    pub fn effective_clusters(&self) -> usize {
        self.centers.len()
    }
}

/// Outcome of [`FuzzyCMeans::execute`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutcome {
    pub centers: Vec<f64>,
    pub thresholds: Vec<f64>,
    pub effective_clusters: usize,
    pub iterations: usize,
    pub converged: bool,
    pub objective_history: Vec<f64>,
    /// Region ids written, `base + cluster index`
    pub labels: RangeInclusive<RegionPixel>,
}

/// Fuzzy c-means engine
pub struct FuzzyCMeans {
    options: FcmOptions,
    estimator: Box<dyn ClusterCountEstimator + Send + Sync>,
    cancel: Option<CancelToken>,
}

impl std::fmt::Debug for FuzzyCMeans {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyCMeans")
            .field("options", &self.options)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

impl FuzzyCMeans {
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidParameters`] if the weight is not
    /// above 1, a fixed count is 0, or the iteration cap is 0.
    pub fn new(options: FcmOptions) -> ClusterResult<Self> {
        if options.weight.is_nan() || options.weight <= 1.0 {
            return Err(ClusterError::InvalidParameters(format!(
                "fuzziness weight must exceed 1, got {}",
                options.weight
            )));
        }
        if options.clusters == ClusterCount::Fixed(0) {
            return Err(ClusterError::InvalidParameters(
                "cluster count must be positive".into(),
            ));
        }
        if options.max_iterations == 0 {
            return Err(ClusterError::InvalidParameters(
                "iteration cap must be positive".into(),
            ));
        }
        Ok(Self {
            options,
            estimator: Box::new(PartitionCoefficientEstimator::default()),
            cancel: None,
        })
    }

    /// Replace the estimator used for [`ClusterCount::Auto`]
    pub fn with_estimator<E>(mut self, estimator: E) -> Self
    where
        E: ClusterCountEstimator + Send + Sync + 'static,
    {
        self.estimator = Box::new(estimator);
        self
    }

    /// Poll `token` before every iteration
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &FcmOptions {
        &self.options
    }

    /// Histogram the clustering runs on
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::EmptyVolume`] for a volume without voxels.
    pub fn histogram(&self, density: &DensityVolume) -> ClusterResult<Histogram> {
        if density.is_dummy() {
            return Err(ClusterError::EmptyVolume);
        }
        let histogram = match self.options.range {
            Some((min, max)) => Histogram::from_volume_in_range(density, min.into(), max.into())?,
            None => Histogram::from_volume(density)?,
        };
        if histogram.total() == 0 {
            return Err(ClusterError::EmptyVolume);
        }
        Ok(histogram)
    }

    /// Cluster the density values and derive thresholds
    ///
    /// A fixed count above the number of distinct density values is
    /// lowered to that number. Centers that are not the nearest center of
    /// any occupied bin are dropped and the rest are merged, so the fit
    /// never has more clusters than distinct values. Nothing is relabeled
    /// and no region ids are allocated.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty volume or cancellation.
    pub fn compute_thresholds(&self, density: &DensityVolume) -> ClusterResult<ClusterFit> {
        let histogram = self.histogram(density)?;
        self.fit_histogram(&histogram)
    }

    /// [`compute_thresholds`](Self::compute_thresholds) on a prepared histogram
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::EmptyVolume`] for a histogram without
    /// samples, or an error on cancellation.
    pub fn fit_histogram(&self, histogram: &Histogram) -> ClusterResult<ClusterFit> {
        if histogram.total() == 0 {
            return Err(ClusterError::EmptyVolume);
        }
        let limit = histogram.distinct_values();
        let state = match self.options.clusters {
            ClusterCount::Fixed(k) => {
                if k > limit {
                    log::warn!(
                        "{} clusters requested for {} distinct values, using {}",
                        k,
                        limit,
                        limit
                    );
                }
                self.run(histogram, k.min(limit))?
            }
            ClusterCount::Auto => self
                .estimator
                .estimate(limit, &mut |k| self.run(histogram, k))?,
        };

        let occupied = occupied_centers(histogram, state.centers());
        let centers = merge_centers(&occupied, self.options.merge_distance);
        if centers.len() < state.cluster_count() {
            log::warn!(
                "{} clusters collapsed to {} distinct centers",
                state.cluster_count(),
                centers.len()
            );
        }
        let thresholds = centers.windows(2).map(|w| (w[0] + w[1]) * 0.5).collect();
        Ok(ClusterFit {
            state,
            centers,
            thresholds,
        })
    }

    /// Cluster `density` and label every voxel of `region`
    ///
    /// Voxel `v` gets `base + n`, where `n` counts the thresholds `≤ v`
    /// and `base` is the start of a fresh block from `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grids differ in extent, clustering fails,
    /// or the registry has no free block. `region` is untouched on error.
    pub fn execute(
        &self,
        density: &DensityVolume,
        region: &mut RegionVolume,
        registry: &mut RegionRegistry,
    ) -> ClusterResult<ClusterOutcome> {
        region.check_same_size(density)?;
        let fit = self.compute_thresholds(density)?;
        let labels = registry.allocate(fit.effective_clusters())?;
        segment_with_thresholds(density, region, &fit.thresholds, *labels.start())?;
        Ok(outcome(fit, labels))
    }

    /// Cluster only the voxels labeled `within` and relabel them
    ///
    /// The histogram covers the selected voxels alone and every other
    /// voxel keeps its label. The histogram range option is not used.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::EmptyVolume`] if no voxel carries `within`,
    /// otherwise the errors of [`execute`](Self::execute).
    pub fn execute_within(
        &self,
        density: &DensityVolume,
        region: &mut RegionVolume,
        registry: &mut RegionRegistry,
        within: RegionPixel,
    ) -> ClusterResult<ClusterOutcome> {
        let histogram = match Histogram::from_volume_masked(density, region, within) {
            Err(voxseg_core::Error::EmptyHistogram) => return Err(ClusterError::EmptyVolume),
            other => other?,
        };
        let fit = self.fit_histogram(&histogram)?;
        let labels = registry.allocate(fit.effective_clusters())?;
        segment_within_label(density, region, &fit.thresholds, *labels.start(), within)?;
        log::debug!("relabeled {} voxels of region {}", histogram.total(), within);
        Ok(outcome(fit, labels))
    }

    /// Run the iteration for `k` clusters on a histogram
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::Cancelled`] if the cancel token fires, or
    /// [`ClusterError::InvalidParameters`] for `k == 0`.
    pub fn run(&self, histogram: &Histogram, k: usize) -> ClusterResult<ClusterState> {
        let mut run = self.start(histogram, k)?;
        while run.step()? {}
        Ok(run.finish())
    }

    /// Initialize a run for `k` clusters without iterating
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidParameters`] for `k == 0`.
    pub fn start<'a>(&'a self, histogram: &'a Histogram, k: usize) -> ClusterResult<FcmRun<'a>> {
        if k == 0 {
            return Err(ClusterError::InvalidParameters(
                "cluster count must be positive".into(),
            ));
        }
        let membership = init_membership(histogram.bin_count(), k, self.options.seed)?;
        Ok(FcmRun {
            options: &self.options,
            cancel: self.cancel.as_ref(),
            histogram,
            k,
            exponent: 2.0 / (self.options.weight - 1.0),
            centers: vec![histogram.mean().unwrap_or(0.0); k],
            powers: vec![0.0; membership.len()],
            membership,
            history: Vec::new(),
            converged: false,
            finished: false,
        })
    }
}

/// Clustering run advanced one iteration at a time
///
/// # Examples
///
/// ```
/// use voxseg_cluster::{FcmOptions, FuzzyCMeans};
/// use voxseg_core::Histogram;
///
/// let mut histogram = Histogram::new(0, 10).unwrap();
/// histogram.add_count(0, 5);
/// histogram.add_count(10, 5);
/// let fcm = FuzzyCMeans::new(FcmOptions::default()).unwrap();
/// let mut run = fcm.start(&histogram, 2).unwrap();
/// while run.step().unwrap() {
///     assert!(run.check_membership());
/// }
/// assert!(run.finish().converged());
/// ```
#[derive(Debug)]
pub struct FcmRun<'a> {
    options: &'a FcmOptions,
    cancel: Option<&'a CancelToken>,
    histogram: &'a Histogram,
    k: usize,
    exponent: f64,
    centers: Vec<f64>,
    membership: Vec<f64>,
    powers: Vec<f64>,
    history: Vec<f64>,
    converged: bool,
    finished: bool,
}

impl FcmRun<'_> {
    /// Perform one iteration
    ///
    /// # Returns
    ///
    /// `false` without iterating once the run has converged or reached
    /// the iteration cap.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::Cancelled`] if the cancel token fired.
    pub fn step(&mut self) -> ClusterResult<bool> {
        if self.finished {
            return Ok(false);
        }
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(ClusterError::Cancelled);
        }
        let opts = self.options;
        let histogram = self.histogram;
        update_powers(&self.membership, opts.weight, &mut self.powers);
        update_centers(histogram, &self.powers, &mut self.centers);
        update_membership(histogram, &self.centers, self.exponent, &mut self.membership);
        update_powers(&self.membership, opts.weight, &mut self.powers);

        let objective = objective(histogram, &self.centers, &self.powers);
        let delta = self.history.last().map(|p| (objective / p - 1.0).abs());
        self.history.push(objective);
        log::debug!(
            "fcm k={} iteration {}: objective {:.6}, delta {:?}",
            self.k,
            self.history.len(),
            objective,
            delta
        );
        if objective < opts.min_change || delta.is_some_and(|d| d < opts.min_change) {
            self.converged = true;
            self.finished = true;
        } else if self.history.len() >= opts.max_iterations {
            log::warn!(
                "fcm k={} hit the iteration cap of {}",
                self.k,
                opts.max_iterations
            );
            self.finished = true;
        }
        Ok(true)
    }

    /// Iterations performed so far
    pub fn iterations(&self) -> usize {
        self.history.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Current memberships of one histogram bin, `None` past the last bin
    pub fn membership_row(&self, bin: usize) -> Option<&[f64]> {
        let start = bin.checked_mul(self.k)?;
        self.membership.get(start..start + self.k)
    }

    /// Whether every current bin row lies in `[0, 1]` and sums to 1
    pub fn check_membership(&self) -> bool {
        membership_is_normalized(&self.membership, self.k)
    }

    pub fn objective_history(&self) -> &[f64] {
        &self.history
    }

    /// Stop iterating and return the state reached
    pub fn finish(self) -> ClusterState {
        let partition_coefficient = partition_coefficient(self.histogram, &self.membership, self.k);
        ClusterState {
            k: self.k,
            centers: self.centers,
            membership: self.membership,
            iterations: self.history.len(),
            converged: self.converged,
            objective_history: self.history,
            partition_coefficient,
        }
    }
}

fn membership_is_normalized(membership: &[f64], k: usize) -> bool {
    const TOLERANCE: f64 = 1.0e-6;
    membership.chunks(k.max(1)).all(|row| {
        row.iter().all(|&u| (0.0..=1.0 + TOLERANCE).contains(&u))
            && (row.iter().sum::<f64>() - 1.0).abs() < TOLERANCE
    })
}

/// Uniform random memberships, each bin row normalized to sum to 1
fn init_membership(bins: usize, k: usize, seed: u64) -> ClusterResult<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let uniform = Uniform::new(0.0f64, 1.0)
        .map_err(|e| ClusterError::InvalidParameters(format!("membership sampler: {e}")))?;
    let mut membership = vec![0.0; bins * k];
    for row in membership.chunks_mut(k) {
        for u in row.iter_mut() {
            *u = uniform.sample(&mut rng);
        }
        let sum: f64 = row.iter().sum();
        if sum > 0.0 {
            row.iter_mut().for_each(|u| *u /= sum);
        } else {
            row.fill(1.0 / k as f64);
        }
    }
    Ok(membership)
}

fn update_powers(membership: &[f64], weight: f64, powers: &mut [f64]) {
    for (p, &u) in powers.iter_mut().zip(membership) {
        *p = u.powf(weight);
    }
}

fn outcome(fit: ClusterFit, labels: RangeInclusive<RegionPixel>) -> ClusterOutcome {
    log::info!(
        "clustered into {} regions after {} iterations, thresholds {:?}",
        fit.effective_clusters(),
        fit.state.iterations(),
        fit.thresholds
    );
    ClusterOutcome {
        effective_clusters: fit.effective_clusters(),
        iterations: fit.state.iterations,
        converged: fit.state.converged,
        objective_history: fit.state.objective_history,
        centers: fit.centers,
        thresholds: fit.thresholds,
        labels,
    }
}

/// Weighted mean of the bins per cluster; a cluster with no weight keeps
/// its previous center
fn update_centers(histogram: &Histogram, powers: &[f64], centers: &mut [f64]) {
    let k = centers.len();
    let mut num = vec![0.0; k];
    let mut den = vec![0.0; k];
    for (bin, row) in powers.chunks(k).enumerate() {
        let count = histogram.count(bin);
        if count == 0 {
            continue;
        }
        let (count, value) = (count as f64, histogram.value(bin));
        for i in 0..k {
            let w = count * row[i];
            num[i] += w * value;
            den[i] += w;
        }
    }
    for i in 0..k {
        if den[i] > 0.0 {
            centers[i] = num[i] / den[i];
        }
    }
}

fn membership_row(row: &mut [f64], value: f64, centers: &[f64], exponent: f64) {
    let exact = centers.iter().filter(|&&c| c == value).count();
    if exact > 0 {
        let share = 1.0 / exact as f64;
        for (u, &c) in row.iter_mut().zip(centers) {
            *u = if c == value { share } else { 0.0 };
        }
        return;
    }
    for (u, &ci) in row.iter_mut().zip(centers) {
        let di = (ci - value).abs();
        let sum: f64 = centers
            .iter()
            .map(|&cj| (di / (cj - value).abs()).powf(exponent))
            .sum();
        *u = 1.0 / sum;
    }
}

#[cfg(not(feature = "rayon"))]
fn update_membership(
    histogram: &Histogram,
    centers: &[f64],
    exponent: f64,
    membership: &mut [f64],
) {
    for (bin, row) in membership.chunks_mut(centers.len()).enumerate() {
        membership_row(row, histogram.value(bin), centers, exponent);
    }
}

#[cfg(feature = "rayon")]
fn update_membership(
    histogram: &Histogram,
    centers: &[f64],
    exponent: f64,
    membership: &mut [f64],
) {
    membership
        .par_chunks_mut(centers.len())
        .enumerate()
        .for_each(|(bin, row)| membership_row(row, histogram.value(bin), centers, exponent));
}

fn objective(histogram: &Histogram, centers: &[f64], powers: &[f64]) -> f64 {
    powers
        .chunks(centers.len())
        .enumerate()
        .map(|(bin, row)| {
            let value = histogram.value(bin);
            let spread: f64 = row
                .iter()
                .zip(centers)
                .map(|(&p, &c)| p * (c - value) * (c - value))
                .sum();
            histogram.count(bin) as f64 * spread
        })
        .sum()
}

fn partition_coefficient(histogram: &Histogram, membership: &[f64], k: usize) -> f64 {
    let total = histogram.total() as f64;
    if total == 0.0 {
        return 0.0;
    }
    let crisp: f64 = membership
        .chunks(k)
        .enumerate()
        .map(|(bin, row)| histogram.count(bin) as f64 * row.iter().map(|u| u * u).sum::<f64>())
        .sum::<f64>()
        / total;
    let inv_k = 1.0 / k as f64;
    (crisp - inv_k) / (1.0 - inv_k + 0.001)
}

/// Centers that are the nearest center of at least one occupied bin
///
/// Order is preserved. Ties go to the first center.
fn occupied_centers(histogram: &Histogram, centers: &[f64]) -> Vec<f64> {
    let mut owns = vec![false; centers.len()];
    for (value, _) in histogram.iter_non_empty() {
        let nearest = centers
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
            .map(|(i, _)| i);
        if let Some(i) = nearest {
            owns[i] = true;
        }
    }
    centers
        .iter()
        .zip(owns)
        .filter_map(|(&c, owned)| owned.then_some(c))
        .collect()
}

/// Sort centers and fold runs closer than `distance` into their mean
fn merge_centers(centers: &[f64], distance: f64) -> Vec<f64> {
    let mut sorted = centers.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut merged: Vec<(f64, usize)> = Vec::with_capacity(sorted.len());
    for c in sorted {
        match merged.last_mut() {
            Some((sum, n)) if c - *sum / (*n as f64) < distance => {
                *sum += c;
                *n += 1;
            }
            _ => merged.push((c, 1)),
        }
    }
    merged.into_iter().map(|(sum, n)| sum / n as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(values: &[(i32, u64)]) -> Histogram {
        let min = values.iter().map(|v| v.0).min().unwrap();
        let max = values.iter().map(|v| v.0).max().unwrap();
        let mut h = Histogram::new(min, max).unwrap();
        for &(v, n) in values {
            h.add_count(v, n);
        }
        h
    }

    #[test]
    fn test_options_validation() {
        assert!(FuzzyCMeans::new(FcmOptions::default().with_weight(1.0)).is_err());
        assert!(FuzzyCMeans::new(FcmOptions::default().with_weight(f64::NAN)).is_err());
        assert!(FuzzyCMeans::new(FcmOptions::default().with_clusters(0)).is_err());
        assert!(FuzzyCMeans::new(FcmOptions::default().with_max_iterations(0)).is_err());
        assert!(FuzzyCMeans::new(FcmOptions::default()).is_ok());
    }

    #[test]
    fn test_init_membership_rows() {
        let m = init_membership(5, 3, 7).unwrap();
        assert_eq!(m.len(), 15);
        for row in m.chunks(3) {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        assert_eq!(m, init_membership(5, 3, 7).unwrap());
    }

    #[test]
    fn test_exact_match_splits_membership() {
        let mut row = [0.0; 3];
        membership_row(&mut row, 4.0, &[4.0, 9.0, 4.0], 2.0);
        assert_eq!(row, [0.5, 0.0, 0.5]);

        membership_row(&mut row, 5.0, &[4.0, 6.0, 100.0], 2.0);
        assert!((row[0] - row[1]).abs() < 1e-12);
        assert!(row[2] < 1e-3);
    }

    #[test]
    fn test_single_cluster_center_is_mean() {
        let h = histogram(&[(0, 1), (10, 3)]);
        let fcm = FuzzyCMeans::new(FcmOptions::default().with_clusters(1)).unwrap();
        let state = fcm.run(&h, 1).unwrap();
        assert!((state.centers()[0] - 7.5).abs() < 1e-9);
        assert!(state.converged());
        assert!(state.partition_coefficient().abs() < 1e-9);
    }

    #[test]
    fn test_two_levels_two_centers() {
        let h = histogram(&[(0, 50), (100, 50)]);
        let fcm = FuzzyCMeans::new(FcmOptions::default()).unwrap();
        let state = fcm.run(&h, 2).unwrap();
        let mut c = state.centers().to_vec();
        c.sort_by(f64::total_cmp);
        assert!(c[0] < 1.0 && c[1] > 99.0, "centers {c:?}");
        assert!(state.check_membership());
        assert!(state.membership_row(h.bin_count()).is_none());
    }

    #[test]
    fn test_merge_centers() {
        assert_eq!(merge_centers(&[10.0, 0.0, 10.2], 0.5), vec![0.0, 10.1]);
        assert_eq!(merge_centers(&[3.0, 1.0], 0.5), vec![1.0, 3.0]);
        assert_eq!(merge_centers(&[], 0.5), Vec::<f64>::new());
    }

    #[test]
    fn test_cancel_before_iteration() {
        let token = CancelToken::new();
        token.cancel();
        let fcm = FuzzyCMeans::new(FcmOptions::default())
            .unwrap()
            .with_cancel_token(token);
        let h = histogram(&[(0, 1), (5, 1)]);
        assert!(matches!(fcm.run(&h, 2), Err(ClusterError::Cancelled)));
    }

    #[test]
    fn test_constant_volume_collapses() {
        let density = DensityVolume::new_with_value(4, 4, 4, 0, 7).unwrap();
        let fcm = FuzzyCMeans::new(FcmOptions::default().with_clusters(2)).unwrap();
        let fit = fcm.compute_thresholds(&density).unwrap();
        assert_eq!(fit.state.cluster_count(), 1);
        assert_eq!(fit.effective_clusters(), 1);
        assert!(fit.thresholds.is_empty());
        assert!((fit.centers[0] - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_occupied_centers() {
        let h = histogram(&[(10, 16), (30, 16)]);
        assert_eq!(occupied_centers(&h, &[10.0, 19.5, 30.0]), vec![10.0, 30.0]);
        assert_eq!(occupied_centers(&h, &[30.0, 10.0]), vec![30.0, 10.0]);
        let h = histogram(&[(0, 27), (50, 27), (100, 27)]);
        assert_eq!(
            occupied_centers(&h, &[0.0, 5.76, 50.0, 100.0]),
            vec![0.0, 50.0, 100.0]
        );
    }

    #[test]
    fn test_step_until_finished() {
        let h = histogram(&[(0, 4), (3, 1), (9, 4)]);
        let fcm = FuzzyCMeans::new(FcmOptions::default().with_max_iterations(3)).unwrap();
        let mut run = fcm.start(&h, 2).unwrap();
        let mut steps = 0;
        while run.step().unwrap() {
            steps += 1;
            assert!(run.check_membership());
            assert_eq!(run.iterations(), steps);
        }
        assert!(steps <= 3);
        assert!(run.is_finished());
        assert!(!run.step().unwrap());
        assert_eq!(run.finish().iterations(), steps);
    }

    #[test]
    fn test_empty_volume() {
        let fcm = FuzzyCMeans::new(FcmOptions::default()).unwrap();
        assert!(matches!(
            fcm.compute_thresholds(&DensityVolume::dummy()),
            Err(ClusterError::EmptyVolume)
        ));
    }
}
