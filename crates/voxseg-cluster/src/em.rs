//! Gaussian mixtures of density samples fitted by expectation maximization
//!
//! Fitting starts from a single component holding the sample mean and
//! variance. After each EM stage the widest component is split in two,
//! its means moved apart by `split_coeff · σ`, until the requested
//! number of components is reached.
//!
//! # Examples
//!
//! ```
//! use voxseg_cluster::{EmOptions, GaussianMixture};
//!
//! let samples = [10.0, 11.0, 12.0, 90.0, 91.0, 92.0];
//! let mixture = GaussianMixture::fit(&samples, &EmOptions::default().with_components(2)).unwrap();
//! assert_eq!(mixture.len(), 2);
//! assert!(mixture.density(11.0) > mixture.density(50.0));
//! ```

use crate::error::{ClusterError, ClusterResult};
use std::f64::consts::PI;

/// Default number of mixture components
pub const DEFAULT_COMPONENTS: usize = 4;
/// Default relative log-likelihood change that ends an EM stage
pub const DEFAULT_EM_MIN_CHANGE: f64 = 1.0e-6;
/// Default iteration cap of one EM stage
pub const DEFAULT_EM_MAX_ITERATIONS: usize = 100;
/// Default split offset in standard deviations
pub const DEFAULT_SPLIT_COEFF: f64 = 0.5;
/// Default lower bound of a component variance
pub const DEFAULT_MIN_VARIANCE: f64 = 0.25;

/// Options for [`GaussianMixture::fit`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmOptions {
    pub components: usize,
    pub min_change: f64,
    pub max_iterations: usize,
    pub split_coeff: f64,
    /// Keeps components on a single repeated value finite
    pub min_variance: f64,
}

impl Default for EmOptions {
    fn default() -> Self {
        Self {
            components: DEFAULT_COMPONENTS,
            min_change: DEFAULT_EM_MIN_CHANGE,
            max_iterations: DEFAULT_EM_MAX_ITERATIONS,
            split_coeff: DEFAULT_SPLIT_COEFF,
            min_variance: DEFAULT_MIN_VARIANCE,
        }
    }
}

impl EmOptions {
    pub fn with_components(mut self, components: usize) -> Self {
        self.components = components;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_min_variance(mut self, min_variance: f64) -> Self {
        self.min_variance = min_variance;
        self
    }

    fn validate(&self) -> ClusterResult<()> {
        if self.components == 0 {
            return Err(ClusterError::InvalidParameters(
                "mixture needs at least one component".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::InvalidParameters(
                "max_iterations must be positive".into(),
            ));
        }
        if self.min_variance.is_nan() || self.min_variance <= 0.0 {
            return Err(ClusterError::InvalidParameters(format!(
                "min_variance must be positive, got {}",
                self.min_variance
            )));
        }
        let positive = |v: f64| !v.is_nan() && v > 0.0;
        if !positive(self.min_change) || !positive(self.split_coeff) {
            return Err(ClusterError::InvalidParameters(
                "min_change and split_coeff must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// One weighted normal distribution of a mixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianComponent {
    pub weight: f64,
    pub mean: f64,
    pub variance: f64,
}

impl GaussianComponent {
    /// `weight · N(x; mean, variance)`
    pub fn weighted_value(&self, x: f64) -> f64 {
        let d = x - self.mean;
        self.weight * (-d * d / (2.0 * self.variance)).exp() / (2.0 * PI * self.variance).sqrt()
    }
}

/// A one-dimensional Gaussian mixture model
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianMixture {
    components: Vec<GaussianComponent>,
    log_likelihood: f64,
}

impl GaussianMixture {
    /// Fit `options.components` components to `samples`
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::NoSamples`] for an empty slice and
    /// [`ClusterError::InvalidParameters`] for unusable options.
    pub fn fit(samples: &[f64], options: &EmOptions) -> ClusterResult<Self> {
        options.validate()?;
        if samples.is_empty() {
            return Err(ClusterError::NoSamples);
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
        let mut mixture = Self {
            components: vec![GaussianComponent {
                weight: 1.0,
                mean,
                variance: variance.max(options.min_variance),
            }],
            log_likelihood: 0.0,
        };

        loop {
            mixture.log_likelihood = mixture.iterate(samples, options);
            log::debug!(
                "EM stage with {} components: log-likelihood {:.4}",
                mixture.components.len(),
                mixture.log_likelihood
            );
            if mixture.components.len() >= options.components {
                break;
            }
            mixture.split_widest(options.split_coeff);
        }
        log::debug!(
            "fitted {} components to {} samples",
            mixture.components.len(),
            samples.len()
        );
        Ok(mixture)
    }

    pub fn components(&self) -> &[GaussianComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Log-likelihood of the samples under the final model
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Mixture density at `x`
    pub fn density(&self, x: f64) -> f64 {
        self.components.iter().map(|c| c.weighted_value(x)).sum()
    }

    /// Run E and M steps until the log-likelihood settles
    fn iterate(&mut self, samples: &[f64], options: &EmOptions) -> f64 {
        let k = self.components.len();
        let mut resp = vec![0.0; samples.len() * k];
        let mut previous: Option<f64> = None;
        let mut current = self.log_likelihood_of(samples);
        for _ in 0..options.max_iterations {
            self.expectation(samples, &mut resp);
            self.maximization(samples, &resp, options.min_variance);
            current = self.log_likelihood_of(samples);
            if let Some(prev) = previous {
                let delta = if prev == 0.0 {
                    current.abs()
                } else {
                    (current / prev - 1.0).abs()
                };
                if delta < options.min_change {
                    break;
                }
            }
            previous = Some(current);
        }
        current
    }

    /// Responsibilities, one row of `k` values per sample
    fn expectation(&self, samples: &[f64], resp: &mut [f64]) {
        let k = self.components.len();
        for (&x, row) in samples.iter().zip(resp.chunks_exact_mut(k)) {
            let mut sum = 0.0;
            for (r, c) in row.iter_mut().zip(&self.components) {
                *r = c.weighted_value(x);
                sum += *r;
            }
            if sum > 0.0 {
                row.iter_mut().for_each(|r| *r /= sum);
            } else {
                // far outside every component: hand it to the closest one
                row.fill(0.0);
                row[self.closest(x)] = 1.0;
            }
        }
    }

    fn maximization(&mut self, samples: &[f64], resp: &[f64], min_variance: f64) {
        let k = self.components.len();
        let n = samples.len() as f64;
        for (i, component) in self.components.iter_mut().enumerate() {
            let column = || samples.iter().zip(resp.iter().skip(i).step_by(k));
            let mass: f64 = column().map(|(_, r)| r).sum();
            if mass <= 0.0 {
                component.weight = 0.0;
                continue;
            }
            let mean = column().map(|(x, r)| r * x).sum::<f64>() / mass;
            let variance = column()
                .map(|(x, r)| r * (x - mean) * (x - mean))
                .sum::<f64>()
                / mass;
            component.weight = mass / n;
            component.mean = mean;
            component.variance = variance.max(min_variance);
        }
    }

    fn log_likelihood_of(&self, samples: &[f64]) -> f64 {
        samples
            .iter()
            .map(|&x| self.density(x).max(f64::MIN_POSITIVE).ln())
            .sum()
    }

    /// Index of the component with the smallest standardized distance to `x`
    fn closest(&self, x: f64) -> usize {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (i, c) in self.components.iter().enumerate() {
            let d = (x - c.mean).abs() / c.variance.sqrt();
            if d < best_d {
                best = i;
                best_d = d;
            }
        }
        best
    }

    fn split_widest(&mut self, split_coeff: f64) {
        let mut widest = 0;
        for (i, c) in self.components.iter().enumerate() {
            if c.variance > self.components[widest].variance {
                widest = i;
            }
        }
        let original = &mut self.components[widest];
        let offset = split_coeff * original.variance.sqrt();
        original.weight *= 0.5;
        let mut twin = *original;
        original.mean += offset;
        twin.mean -= offset;
        self.components.push(twin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GROUPS: [f64; 12] = [
        10.0, 11.0, 12.0, 10.0, 11.0, 12.0, 90.0, 91.0, 92.0, 90.0, 91.0, 92.0,
    ];

    fn sorted_means(mixture: &GaussianMixture) -> Vec<f64> {
        let mut means: Vec<f64> = mixture.components().iter().map(|c| c.mean).collect();
        means.sort_by(f64::total_cmp);
        means
    }

    #[test]
    fn test_fit_two_groups() {
        let options = EmOptions::default().with_components(2);
        let mixture = GaussianMixture::fit(&TWO_GROUPS, &options).unwrap();
        let means = sorted_means(&mixture);
        assert!((means[0] - 11.0).abs() < 1.0, "low mean {}", means[0]);
        assert!((means[1] - 91.0).abs() < 1.0, "high mean {}", means[1]);
        for c in mixture.components() {
            assert!((c.weight - 0.5).abs() < 0.05);
        }
        assert!(mixture.density(11.0) > 100.0 * mixture.density(51.0));
    }

    #[test]
    fn test_weights_sum_to_one() {
        let mixture = GaussianMixture::fit(&TWO_GROUPS, &EmOptions::default()).unwrap();
        assert_eq!(mixture.len(), DEFAULT_COMPONENTS);
        let total: f64 = mixture.components().iter().map(|c| c.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(mixture.log_likelihood().is_finite());
    }

    #[test]
    fn test_repeated_value_uses_variance_floor() {
        let options = EmOptions::default().with_components(1);
        let mixture = GaussianMixture::fit(&[50.0; 5], &options).unwrap();
        let c = mixture.components()[0];
        assert_eq!(c.mean, 50.0);
        assert_eq!(c.variance, DEFAULT_MIN_VARIANCE);
        let peak = 1.0 / (2.0 * PI * DEFAULT_MIN_VARIANCE).sqrt();
        assert!((mixture.density(50.0) - peak).abs() < 1e-12);
    }

    #[test]
    fn test_split_moves_means_apart() {
        let mut mixture = GaussianMixture {
            components: vec![GaussianComponent {
                weight: 1.0,
                mean: 40.0,
                variance: 16.0,
            }],
            log_likelihood: 0.0,
        };
        mixture.split_widest(0.5);
        assert_eq!(sorted_means(&mixture), vec![38.0, 42.0]);
        assert!(mixture.components().iter().all(|c| c.weight == 0.5));
    }

    #[test]
    fn test_invalid_fit() {
        let options = EmOptions::default();
        assert!(matches!(
            GaussianMixture::fit(&[], &options),
            Err(ClusterError::NoSamples)
        ));
        assert!(matches!(
            GaussianMixture::fit(&[1.0], &options.with_components(0)),
            Err(ClusterError::InvalidParameters(_))
        ));
        assert!(GaussianMixture::fit(&[1.0], &options.with_min_variance(0.0)).is_err());
    }
}
