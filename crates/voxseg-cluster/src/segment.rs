//! Relabeling by density thresholds

use crate::error::ClusterResult;
use voxseg_core::{DensityVolume, RegionPixel, RegionVolume};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Label of a density value: `base` plus the number of thresholds `≤ value`
///
/// `thresholds` must be sorted ascending.
#[inline]
pub fn label_for(value: f64, thresholds: &[f64], base: RegionPixel) -> RegionPixel {
    let above = thresholds.partition_point(|&t| t <= value);
    base.saturating_add(above.min(RegionPixel::MAX as usize) as RegionPixel)
}

/// Label every interior voxel of `region` from `density`
///
/// Thresholds are sorted before use. Margin cells are left untouched.
///
/// # Errors
///
/// Returns an error if the grids differ in extent.
pub fn segment_with_thresholds(
    density: &DensityVolume,
    region: &mut RegionVolume,
    thresholds: &[f64],
    base: RegionPixel,
) -> ClusterResult<()> {
    relabel(density, region, thresholds, base, None)
}

/// Like [`segment_with_thresholds`], rewriting only voxels labeled `within`
///
/// # Errors
///
/// Returns an error if the grids differ in extent.
pub fn segment_within_label(
    density: &DensityVolume,
    region: &mut RegionVolume,
    thresholds: &[f64],
    base: RegionPixel,
    within: RegionPixel,
) -> ClusterResult<()> {
    relabel(density, region, thresholds, base, Some(within))
}

fn relabel(
    density: &DensityVolume,
    region: &mut RegionVolume,
    thresholds: &[f64],
    base: RegionPixel,
    within: Option<RegionPixel>,
) -> ClusterResult<()> {
    region.check_same_size(density)?;
    let mut sorted = thresholds.to_vec();
    sorted.sort_by(f64::total_cmp);

    let layout = region.row_layout();
    let slice_len = layout.slice_len();
    if slice_len == 0 {
        return Ok(());
    }

    let label_slice = |(index, slice): (usize, &mut [RegionPixel])| {
        let Some(z) = layout.slice_z(index) else {
            return;
        };
        for (r, row) in slice.chunks_mut(layout.stride()).enumerate() {
            let Some(y) = layout.slice_row_y(r) else {
                continue;
            };
            for (label, &d) in row[layout.interior()].iter_mut().zip(density.row(y, z)) {
                if within.is_none_or(|w| *label == w) {
                    *label = label_for(d as f64, &sorted, base);
                }
            }
        }
    };

    #[cfg(feature = "rayon")]
    region
        .data_mut()
        .par_chunks_mut(slice_len)
        .enumerate()
        .for_each(label_slice);

    #[cfg(not(feature = "rayon"))]
    region
        .data_mut()
        .chunks_mut(slice_len)
        .enumerate()
        .for_each(label_slice);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_for() {
        let t = [25.0, 75.0];
        assert_eq!(label_for(0.0, &t, 1), 1);
        assert_eq!(label_for(25.0, &t, 1), 2);
        assert_eq!(label_for(74.9, &t, 1), 2);
        assert_eq!(label_for(100.0, &t, 1), 3);
        assert_eq!(label_for(5.0, &[], 4), 4);
    }

    #[test]
    fn test_segment_keeps_margin() {
        let mut density = DensityVolume::new(4, 1, 1, 1).unwrap();
        for (x, v) in density.row_mut(0, 0).iter_mut().enumerate() {
            *v = (x * 10) as i16;
        }
        let mut region = RegionVolume::new_like(&density);
        region.fill(9);
        segment_with_thresholds(&density, &mut region, &[15.0], 3).unwrap();
        assert_eq!(region.row(0, 0), &[3, 3, 4, 4]);
        assert_eq!(region.at(-1, 0, 0), 9);
        assert_eq!(region.at(0, 0, 1), 9);
    }

    #[test]
    fn test_segment_within_label() {
        let mut density = DensityVolume::new(4, 1, 1, 0).unwrap();
        density.row_mut(0, 0).copy_from_slice(&[0, 10, 20, 30]);
        let mut region = RegionVolume::new_like(&density);
        region.row_mut(0, 0).copy_from_slice(&[2, 8, 8, 2]);
        segment_within_label(&density, &mut region, &[15.0], 4, 8).unwrap();
        assert_eq!(region.row(0, 0), &[2, 4, 5, 2]);
    }

    #[test]
    fn test_segment_size_mismatch() {
        let density = DensityVolume::new(4, 1, 1, 0).unwrap();
        let mut region = RegionVolume::new(3, 1, 1, 0).unwrap();
        assert!(segment_with_thresholds(&density, &mut region, &[], 1).is_err());
    }
}
