//! Dilation and erosion of one region label
//!
//! A [`StructuringElement`] is a set of voxel offsets. With `A` the voxels
//! carrying the label and `B` the element:
//!
//! - dilation labels every `a + b`
//! - erosion keeps `x` only if every `x + b` inside the volume is in `A`
//! - opening is erosion then dilation, closing the reverse
//!
//! Offsets that leave the volume are ignored, so the volume edge does not
//! erode a region touching it. Every operation works on a copy and
//! replaces the region only when the pass completes.

use crate::error::{RegionError, RegionResult};
use voxseg_core::{CancelToken, RegionPixel, RegionVolume, UNLABELED};

/// Voxel offsets relative to the element origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    offsets: Vec<(i32, i32, i32)>,
}

impl StructuringElement {
    /// Element from explicit offsets; duplicates are dropped
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidParameters`] if `offsets` is empty.
    pub fn from_offsets<I>(offsets: I) -> RegionResult<Self>
    where
        I: IntoIterator<Item = (i32, i32, i32)>,
    {
        let mut offsets: Vec<_> = offsets.into_iter().collect();
        offsets.sort_unstable();
        offsets.dedup();
        if offsets.is_empty() {
            return Err(RegionError::InvalidParameters(
                "structuring element has no offsets".into(),
            ));
        }
        Ok(Self { offsets })
    }

    /// Origin and its 6 face neighbours
    pub fn cross() -> Self {
        Self {
            offsets: vec![
                (0, 0, -1),
                (0, -1, 0),
                (-1, 0, 0),
                (0, 0, 0),
                (1, 0, 0),
                (0, 1, 0),
                (0, 0, 1),
            ],
        }
    }

    /// Box of half-sizes `rx`, `ry`, `rz` around the origin
    ///
    /// `rz = 0` gives an in-plane element for XY slices.
    pub fn brick(rx: u32, ry: u32, rz: u32) -> Self {
        let (rx, ry, rz) = (rx as i32, ry as i32, rz as i32);
        let mut offsets = Vec::new();
        for dz in -rz..=rz {
            for dy in -ry..=ry {
                for dx in -rx..=rx {
                    offsets.push((dx, dy, dz));
                }
            }
        }
        Self { offsets }
    }

    /// Voxels within euclidean distance `radius` of the origin
    pub fn ball(radius: u32) -> Self {
        let r = radius as i32;
        let r2 = r * r;
        let mut offsets = Vec::new();
        for dz in -r..=r {
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy + dz * dz <= r2 {
                        offsets.push((dx, dy, dz));
                    }
                }
            }
        }
        Self { offsets }
    }

    pub fn offsets(&self) -> &[(i32, i32, i32)] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Morphological operations on the voxels of one label
#[derive(Debug, Clone)]
pub struct Morphology {
    element: StructuringElement,
    label: RegionPixel,
    background: RegionPixel,
    protect_other_regions: bool,
    cancel: Option<CancelToken>,
}

impl Morphology {
    /// Operations on `label`; eroded voxels become [`UNLABELED`]
    pub fn new(element: StructuringElement, label: RegionPixel) -> Self {
        Self {
            element,
            label,
            background: UNLABELED,
            protect_other_regions: false,
            cancel: None,
        }
    }

    /// Label written where erosion removes voxels
    pub fn with_background(mut self, background: RegionPixel) -> Self {
        self.background = background;
        self
    }

    /// Let dilation grow only into background voxels
    pub fn with_protect_other_regions(mut self, protect: bool) -> Self {
        self.protect_other_regions = protect;
        self
    }

    /// Poll `token` before every z slice
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn element(&self) -> &StructuringElement {
        &self.element
    }

    /// Grow the label by the element
    ///
    /// # Returns
    ///
    /// The number of voxels newly labeled.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Cancelled`] if the token fires; `region` is
    /// then unchanged.
    pub fn dilate(&self, region: &mut RegionVolume) -> RegionResult<usize> {
        let (dilated, changed) = self.dilate_pass(region)?;
        *region = dilated;
        log::debug!("dilated label {}: {} voxels added", self.label, changed);
        Ok(changed)
    }

    /// Shrink the label by the element
    ///
    /// # Returns
    ///
    /// The number of voxels removed from the label.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Cancelled`] if the token fires; `region` is
    /// then unchanged.
    pub fn erode(&self, region: &mut RegionVolume) -> RegionResult<usize> {
        let (eroded, changed) = self.erode_pass(region)?;
        *region = eroded;
        log::debug!("eroded label {}: {} voxels removed", self.label, changed);
        Ok(changed)
    }

    /// Erosion followed by dilation; removes parts thinner than the element
    ///
    /// # Returns
    ///
    /// The number of voxels whose label differs afterwards.
    pub fn open(&self, region: &mut RegionVolume) -> RegionResult<usize> {
        let (eroded, _) = self.erode_pass(region)?;
        let (opened, _) = self.dilate_pass(&eroded)?;
        Ok(commit(region, opened))
    }

    /// Dilation followed by erosion; fills gaps thinner than the element
    ///
    /// # Returns
    ///
    /// The number of voxels whose label differs afterwards.
    pub fn close(&self, region: &mut RegionVolume) -> RegionResult<usize> {
        let (dilated, _) = self.dilate_pass(region)?;
        let (closed, _) = self.erode_pass(&dilated)?;
        Ok(commit(region, closed))
    }

    fn check_cancel(&self) -> RegionResult<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(RegionError::Cancelled);
        }
        Ok(())
    }

    fn dilate_pass(&self, src: &RegionVolume) -> RegionResult<(RegionVolume, usize)> {
        let mut dst = src.clone();
        let mut changed = 0;
        let (xs, ys, zs) = src.dimensions();
        for z in 0..zs as i32 {
            self.check_cancel()?;
            for y in 0..ys as i32 {
                for x in 0..xs as i32 {
                    if src.at(x, y, z) != self.label {
                        continue;
                    }
                    for &(dx, dy, dz) in self.element.offsets() {
                        let (tx, ty, tz) = (x + dx, y + dy, z + dz);
                        if !dst.is_in(tx, ty, tz) {
                            continue;
                        }
                        let current = dst.at(tx, ty, tz);
                        if current == self.label
                            || (self.protect_other_regions && current != self.background)
                        {
                            continue;
                        }
                        dst.set_at(tx, ty, tz, self.label);
                        changed += 1;
                    }
                }
            }
        }
        Ok((dst, changed))
    }

    fn erode_pass(&self, src: &RegionVolume) -> RegionResult<(RegionVolume, usize)> {
        let mut dst = src.clone();
        let mut changed = 0;
        let (xs, ys, zs) = src.dimensions();
        for z in 0..zs as i32 {
            self.check_cancel()?;
            for y in 0..ys as i32 {
                for x in 0..xs as i32 {
                    if src.at(x, y, z) != self.label {
                        continue;
                    }
                    let covered = self.element.offsets().iter().all(|&(dx, dy, dz)| {
                        let (tx, ty, tz) = (x + dx, y + dy, z + dz);
                        !src.is_in(tx, ty, tz) || src.at(tx, ty, tz) == self.label
                    });
                    if !covered {
                        dst.set_at(x, y, z, self.background);
                        changed += 1;
                    }
                }
            }
        }
        Ok((dst, changed))
    }
}

/// Replace `region` with `result` and count the voxels that changed
fn commit(region: &mut RegionVolume, result: RegionVolume) -> usize {
    let changed = region
        .iter()
        .zip(result.iter())
        .filter(|(a, b)| a != b)
        .count();
    *region = result;
    changed
}
