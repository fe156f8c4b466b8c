//! Density histogram
//!
//! Counts per density value with a bin width of one density unit over an
//! inclusive `[min, max]` range. The clustering engine works on these bins
//! rather than on individual voxels.

use crate::error::{Error, Result};
use crate::grid::Volume;

/// Counts over an inclusive value range, one bin per integer value
///
/// The value of bin `i` is `min + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    min: i32,
    counts: Vec<u64>,
}

impl Histogram {
    /// Create an empty histogram over `[min, max]`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `max < min`.
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if max < min {
            return Err(Error::InvalidParameter(format!(
                "histogram range is empty: [{}, {}]",
                min, max
            )));
        }
        let bins = (max as i64 - min as i64 + 1) as usize;
        Ok(Self {
            min,
            counts: vec![0; bins],
        })
    }

    /// Histogram of every interior voxel over the observed value range
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHistogram`] for a dummy volume.
    pub fn from_volume<T>(volume: &Volume<T>) -> Result<Self>
    where
        T: Copy + PartialOrd + Into<i32>,
    {
        let (lo, hi) = volume.min_max().ok_or(Error::EmptyHistogram)?;
        Self::from_volume_in_range(volume, lo.into(), hi.into())
    }

    /// Histogram of every interior voxel over a fixed range
    ///
    /// Values outside `[min, max]` are counted in the nearest end bin.
    pub fn from_volume_in_range<T>(volume: &Volume<T>, min: i32, max: i32) -> Result<Self>
    where
        T: Copy + Into<i32>,
    {
        if volume.is_dummy() {
            return Err(Error::EmptyHistogram);
        }
        let mut hist = Self::new(min, max)?;
        for v in volume.iter() {
            hist.add(v.into());
        }
        Ok(hist)
    }

    /// Histogram of the interior voxels whose `mask` cell equals `label`
    ///
    /// The range is the observed range of the selected voxels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the grids differ in extent,
    /// or [`Error::EmptyHistogram`] if no voxel is selected.
    pub fn from_volume_masked<T, M>(
        volume: &Volume<T>,
        mask: &Volume<M>,
        label: M,
    ) -> Result<Self>
    where
        T: Copy + Into<i32>,
        M: Copy + PartialEq,
    {
        volume.check_same_size(mask)?;
        let selected = || {
            volume
                .iter()
                .zip(mask.iter())
                .filter(|&(_, m)| m == label)
                .map(|(v, _)| v.into())
        };
        let (lo, hi) = selected()
            .fold(None, |range: Option<(i32, i32)>, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or(Error::EmptyHistogram)?;
        let mut hist = Self::new(lo, hi)?;
        selected().for_each(|v| hist.add(v));
        Ok(hist)
    }

    /// Count one sample, clamped into the range
    #[inline]
    pub fn add(&mut self, value: i32) {
        self.add_count(value, 1);
    }

    /// Count `n` samples of `value`, clamped into the range
    pub fn add_count(&mut self, value: i32, n: u64) {
        let bin = (value as i64 - self.min as i64).clamp(0, self.counts.len() as i64 - 1);
        self.counts[bin as usize] += n;
    }

    #[inline]
    pub fn min_value(&self) -> i32 {
        self.min
    }

    #[inline]
    pub fn max_value(&self) -> i32 {
        self.min + self.counts.len() as i32 - 1
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Count in bin `bin`, 0 outside the range
    pub fn count(&self, bin: usize) -> u64 {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    /// Density value represented by bin `bin`
    #[inline]
    pub fn value(&self, bin: usize) -> f64 {
        self.min as f64 + bin as f64
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of samples
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of bins with a non-zero count
    pub fn distinct_values(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// `(value, count)` for every non-empty bin
    pub fn iter_non_empty(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(i, &c)| (self.value(i), c))
    }

    /// Count-weighted mean value, `None` if empty
    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let sum: f64 = self.iter_non_empty().map(|(v, c)| v * c as f64).sum();
        Some(sum / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_basic() {
        let mut h = Histogram::new(-2, 2).unwrap();
        h.add(-2);
        h.add(0);
        h.add(0);
        h.add(17);
        assert_eq!(h.bin_count(), 5);
        assert_eq!(h.count(0), 1);
        assert_eq!(h.count(2), 2);
        assert_eq!(h.count(4), 1);
        assert_eq!(h.total(), 4);
        assert_eq!(h.distinct_values(), 3);
        assert_eq!(h.max_value(), 2);
    }

    #[test]
    fn test_histogram_empty_range() {
        assert!(Histogram::new(3, 2).is_err());
    }

    #[test]
    fn test_histogram_from_volume() {
        let mut v: Volume<i16> = Volume::new(4, 1, 1, 1).unwrap();
        v.fill_margin(i16::MIN);
        v.set_at(0, 0, 0, 10);
        v.set_at(1, 0, 0, 12);
        v.set_at(2, 0, 0, 12);
        v.set_at(3, 0, 0, 11);
        let h = Histogram::from_volume(&v).unwrap();
        assert_eq!(h.min_value(), 10);
        assert_eq!(h.max_value(), 12);
        assert_eq!(h.counts(), &[1, 1, 2]);
        assert!((h.mean().unwrap() - 11.25).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_masked() {
        let mut v: Volume<i16> = Volume::new(4, 1, 1, 0).unwrap();
        v.row_mut(0, 0).copy_from_slice(&[5, 40, 42, 90]);
        let mut mask: Volume<u16> = Volume::new_like(&v);
        mask.row_mut(0, 0).copy_from_slice(&[0, 3, 3, 1]);
        let h = Histogram::from_volume_masked(&v, &mask, 3).unwrap();
        assert_eq!(h.min_value(), 40);
        assert_eq!(h.max_value(), 42);
        assert_eq!(h.total(), 2);
        assert_eq!(
            Histogram::from_volume_masked(&v, &mask, 7),
            Err(Error::EmptyHistogram)
        );
        let small: Volume<u16> = Volume::new(3, 1, 1, 0).unwrap();
        assert!(Histogram::from_volume_masked(&v, &small, 0).is_err());
    }

    #[test]
    fn test_histogram_dummy() {
        let v = Volume::<i16>::dummy();
        assert_eq!(Histogram::from_volume(&v), Err(Error::EmptyHistogram));
    }
}
