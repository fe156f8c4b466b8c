//! Density samplers
//!
//! A sampler turns a voxel position into training samples. Voxels outside
//! the volume produce nothing.

use crate::training::TrainingSet;
use voxseg_core::{DensityPixel, DensityVolume};

const FACE_NEIGHBORS: [(i32, i32, i32); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// Density of an interior voxel; margin cells count as outside
#[inline]
fn interior(density: &DensityVolume, x: i32, y: i32, z: i32) -> Option<DensityPixel> {
    density.is_in(x, y, z).then(|| density.at(x, y, z))
}

pub trait Sampler {
    type Sample: Copy + Into<f64>;

    /// Append the samples taken at `voxel` to `set`
    fn sample(
        &self,
        density: &DensityVolume,
        voxel: (i32, i32, i32),
        set: &mut TrainingSet<Self::Sample>,
    );
}

/// The density of the voxel itself
#[derive(Debug, Clone, Copy, Default)]
pub struct VoxelValueSampler;

impl Sampler for VoxelValueSampler {
    type Sample = DensityPixel;

    fn sample(
        &self,
        density: &DensityVolume,
        (x, y, z): (i32, i32, i32),
        set: &mut TrainingSet<DensityPixel>,
    ) {
        if let Some(v) = interior(density, x, y, z) {
            set.add(v);
        }
    }
}

/// The voxel and its six face neighbors as separate samples
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighbourhoodSampler;

impl Sampler for NeighbourhoodSampler {
    type Sample = DensityPixel;

    fn sample(
        &self,
        density: &DensityVolume,
        (x, y, z): (i32, i32, i32),
        set: &mut TrainingSet<DensityPixel>,
    ) {
        let Some(center) = interior(density, x, y, z) else {
            return;
        };
        set.add(center);
        for (dx, dy, dz) in FACE_NEIGHBORS {
            if let Some(v) = interior(density, x + dx, y + dy, z + dz) {
                set.add(v);
            }
        }
    }
}

/// Mean density of the 3×3×3 block around the voxel
///
/// Only voxels inside the volume enter the mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSampler;

impl Sampler for MeanSampler {
    type Sample = f64;

    fn sample(
        &self,
        density: &DensityVolume,
        (x, y, z): (i32, i32, i32),
        set: &mut TrainingSet<f64>,
    ) {
        if !density.is_in(x, y, z) {
            return;
        }
        let mut sum = 0.0;
        let mut n = 0u32;
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if let Some(v) = interior(density, x + dx, y + dy, z + dz) {
                        sum += f64::from(v);
                        n += 1;
                    }
                }
            }
        }
        set.add(sum / f64::from(n));
    }
}
