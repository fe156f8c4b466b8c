use crate::error::{Error, Result};
use crate::grid::Plane;

/// Physical voxel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            dx: 1.0,
            dy: 1.0,
            dz: 1.0,
        }
    }
}

/// 3D grid with a border margin
///
/// A volume either holds data or is a *dummy*: the zero-size state used
/// for "no data loaded yet". Dummy volumes answer `false` to every bounds
/// query and iterate over nothing.
///
/// # Memory Layout
///
/// See the [module documentation](crate::grid).
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T> {
    data: Vec<T>,
    x_size: u32,
    y_size: u32,
    z_size: u32,
    margin: u32,
    spacing: Spacing,
}

/// Row geometry of a volume's raw storage
///
/// Lets callers walk the raw buffer row by row, e.g. with
/// `chunks_mut(layout.stride())`, while mapping each chunk back to grid
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    stride: usize,
    rows_per_slice: usize,
    x_size: u32,
    y_size: u32,
    z_size: u32,
    margin: u32,
}

impl RowLayout {
    /// Number of stored cells per row, margin included
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// `(y, z)` of the raw row with the given index, `None` for margin rows
    pub fn row_position(&self, row: usize) -> Option<(i32, i32)> {
        let m = self.margin as usize;
        let y = row % self.rows_per_slice;
        let z = row / self.rows_per_slice;
        if y < m || y >= m + self.y_size as usize || z < m || z >= m + self.z_size as usize {
            return None;
        }
        Some(((y - m) as i32, (z - m) as i32))
    }

    /// Number of stored cells per z slice, margin included
    #[inline]
    pub fn slice_len(&self) -> usize {
        self.stride * self.rows_per_slice
    }

    /// `z` of the raw slice with the given index, `None` for margin slices
    pub fn slice_z(&self, slice: usize) -> Option<i32> {
        let m = self.margin as usize;
        (slice >= m && slice < m + self.z_size as usize).then(|| (slice - m) as i32)
    }

    /// `y` of a raw row within a slice, `None` for margin rows
    pub fn slice_row_y(&self, row: usize) -> Option<i32> {
        let m = self.margin as usize;
        (row >= m && row < m + self.y_size as usize).then(|| (row - m) as i32)
    }

    /// Range of interior cells within one raw row
    #[inline]
    pub fn interior(&self) -> std::ops::Range<usize> {
        let m = self.margin as usize;
        m..m + self.x_size as usize
    }
}

fn checked_len(x: u32, y: u32, z: u32, margin: u32) -> Result<usize> {
    let pad = |s: u32| {
        s.checked_add(margin.checked_mul(2)?)
            .filter(|&p| p <= i32::MAX as u32)
            .map(|p| p as usize)
    };
    pad(x)
        .zip(pad(y))
        .zip(pad(z))
        .and_then(|((a, b), c)| a.checked_mul(b)?.checked_mul(c))
        .ok_or(Error::InvalidDimension { x, y, z })
}

impl<T: Copy + Default> Volume<T> {
    /// Create a volume filled with `T::default()`
    ///
    /// # Arguments
    ///
    /// * `x_size`, `y_size`, `z_size` - Extent in voxels, margin excluded
    /// * `margin` - Width of the border ring
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if any side is zero or the
    /// storage size overflows.
    pub fn new(x_size: u32, y_size: u32, z_size: u32, margin: u32) -> Result<Self> {
        Self::new_with_value(x_size, y_size, z_size, margin, T::default())
    }

    /// Create a volume with every cell, margin included, set to `value`
    pub fn new_with_value(
        x_size: u32,
        y_size: u32,
        z_size: u32,
        margin: u32,
        value: T,
    ) -> Result<Self> {
        if x_size == 0 || y_size == 0 || z_size == 0 {
            return Err(Error::InvalidDimension {
                x: x_size,
                y: y_size,
                z: z_size,
            });
        }
        let len = checked_len(x_size, y_size, z_size, margin)?;
        Ok(Self {
            data: vec![value; len],
            x_size,
            y_size,
            z_size,
            margin,
            spacing: Spacing::default(),
        })
    }

    /// Create a volume with the size and margin of another one
    pub fn new_like<U>(other: &Volume<U>) -> Self {
        let (x, y, z) = other.dimensions();
        let len = other.data.len();
        Self {
            data: vec![T::default(); len],
            x_size: x,
            y_size: y,
            z_size: z,
            margin: other.margin,
            spacing: other.spacing,
        }
    }

    /// Zero-size volume meaning "no data yet"
    pub fn dummy() -> Self {
        Self {
            data: Vec::new(),
            x_size: 0,
            y_size: 0,
            z_size: 0,
            margin: 0,
            spacing: Spacing::default(),
        }
    }

    /// Reallocate to a new size; all contents are cleared to `T::default()`
    ///
    /// Resizing to a zero extent turns the volume into a dummy.
    pub fn resize(&mut self, x_size: u32, y_size: u32, z_size: u32, margin: u32) -> Result<()> {
        if x_size == 0 || y_size == 0 || z_size == 0 {
            *self = Self {
                spacing: self.spacing,
                ..Self::dummy()
            };
            return Ok(());
        }
        let len = checked_len(x_size, y_size, z_size, margin)?;
        self.data.clear();
        self.data.resize(len, T::default());
        self.x_size = x_size;
        self.y_size = y_size;
        self.z_size = z_size;
        self.margin = margin;
        Ok(())
    }

    /// Set every stored cell, margin included
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Set only the cells of the border ring
    pub fn fill_margin(&mut self, value: T) {
        if self.margin == 0 || self.is_dummy() {
            return;
        }
        let layout = self.row_layout();
        let interior = layout.interior();
        for (row, chunk) in self.data.chunks_mut(layout.stride).enumerate() {
            if layout.row_position(row).is_some() {
                chunk[..interior.start].fill(value);
                chunk[interior.end..].fill(value);
            } else {
                chunk.fill(value);
            }
        }
    }

    /// Copy slice `z` into a new plane with the same margin
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinateOutOfBounds`] if `z` is outside the
    /// extent.
    pub fn plane_xy(&self, z: i32) -> Result<Plane<T>> {
        self.check_slice(z)?;
        let mut plane = Plane::new(self.x_size, self.y_size, self.margin)?;
        let m = self.margin as i32;
        for y in -m..self.y_size as i32 + m {
            for x in -m..self.x_size as i32 + m {
                plane.set_at(x, y, self.at(x, y, z));
            }
        }
        Ok(plane)
    }

    /// Write a plane back into slice `z`, margin excluded
    ///
    /// # Errors
    ///
    /// Returns an error if `z` is outside the extent or the plane extent
    /// differs from the volume's XY extent.
    pub fn set_plane_xy(&mut self, z: i32, plane: &Plane<T>) -> Result<()> {
        self.check_slice(z)?;
        if plane.dimensions() != (self.x_size, self.y_size) {
            let (px, py) = plane.dimensions();
            return Err(Error::DimensionMismatch {
                expected: (self.x_size, self.y_size, 1),
                actual: (px, py, 1),
            });
        }
        for y in 0..self.y_size as i32 {
            self.row_mut(y, z).copy_from_slice(plane.row(y));
        }
        Ok(())
    }

    fn check_slice(&self, z: i32) -> Result<()> {
        if z < 0 || z >= self.z_size as i32 {
            return Err(Error::CoordinateOutOfBounds { x: 0, y: 0, z });
        }
        Ok(())
    }
}

impl<T> Volume<T> {
    /// Whether this is the zero-size placeholder
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn x_size(&self) -> u32 {
        self.x_size
    }

    #[inline]
    pub fn y_size(&self) -> u32 {
        self.y_size
    }

    #[inline]
    pub fn z_size(&self) -> u32 {
        self.z_size
    }

    /// Extent `(x, y, z)`, margin excluded
    #[inline]
    pub fn dimensions(&self) -> (u32, u32, u32) {
        (self.x_size, self.y_size, self.z_size)
    }

    #[inline]
    pub fn margin(&self) -> u32 {
        self.margin
    }

    #[inline]
    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: Spacing) {
        self.spacing = spacing;
    }

    /// Builder form of [`set_spacing`](Self::set_spacing)
    pub fn with_spacing(mut self, dx: f32, dy: f32, dz: f32) -> Self {
        self.spacing = Spacing { dx, dy, dz };
        self
    }

    /// Number of interior voxels
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.x_size as usize * self.y_size as usize * self.z_size as usize
    }

    /// Whether two grids have the same extent, regardless of cell type
    /// and margin
    pub fn same_size<U>(&self, other: &Volume<U>) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Check that `other` has the same extent
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    pub fn check_same_size<U>(&self, other: &Volume<U>) -> Result<()> {
        if self.same_size(other) {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            })
        }
    }

    /// Check whether `(x, y, z)` is inside the extent, margin excluded
    #[inline]
    pub fn is_in(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && x < self.x_size as i32
            && y < self.y_size as i32
            && z < self.z_size as i32
    }

    /// Check whether `(x, y, z)` is addressable, margin included
    #[inline]
    pub fn contains_with_margin(&self, x: i32, y: i32, z: i32) -> bool {
        if self.is_dummy() {
            return false;
        }
        let m = self.margin as i32;
        x >= -m
            && y >= -m
            && z >= -m
            && x < self.x_size as i32 + m
            && y < self.y_size as i32 + m
            && z < self.z_size as i32 + m
    }

    #[inline]
    fn stride_x(&self) -> usize {
        (self.x_size + 2 * self.margin) as usize
    }

    #[inline]
    fn stride_y(&self) -> usize {
        (self.y_size + 2 * self.margin) as usize
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        debug_assert!(
            self.contains_with_margin(x, y, z),
            "voxel ({}, {}, {}) outside {:?} with margin {}",
            x,
            y,
            z,
            self.dimensions(),
            self.margin
        );
        let m = self.margin as i32;
        ((z + m) as usize * self.stride_y() + (y + m) as usize) * self.stride_x() + (x + m) as usize
    }

    /// Raw row geometry for buffer-level passes
    pub fn row_layout(&self) -> RowLayout {
        RowLayout {
            stride: self.stride_x(),
            rows_per_slice: self.stride_y(),
            x_size: self.x_size,
            y_size: self.y_size,
            z_size: self.z_size,
            margin: self.margin,
        }
    }

    /// Raw storage, margin included
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw storage, margin included
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Interior cells of row `(y, z)`
    pub fn row(&self, y: i32, z: i32) -> &[T] {
        let start = self.index(0, y, z);
        &self.data[start..start + self.x_size as usize]
    }

    /// Mutable interior cells of row `(y, z)`
    pub fn row_mut(&mut self, y: i32, z: i32) -> &mut [T] {
        let start = self.index(0, y, z);
        let len = self.x_size as usize;
        &mut self.data[start..start + len]
    }
}

impl<T: Copy> Volume<T> {
    /// Checked read, margin included
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<T> {
        if self.contains_with_margin(x, y, z) {
            Some(self.data[self.index(x, y, z)])
        } else {
            None
        }
    }

    /// Checked write, margin included
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinateOutOfBounds`] outside the margin.
    pub fn set(&mut self, x: i32, y: i32, z: i32, value: T) -> Result<()> {
        if !self.contains_with_margin(x, y, z) {
            return Err(Error::CoordinateOutOfBounds { x, y, z });
        }
        let i = self.index(x, y, z);
        self.data[i] = value;
        Ok(())
    }

    /// Unchecked read for hot loops
    ///
    /// Coordinates outside the margin are a contract violation caught by a
    /// debug assertion.
    #[inline]
    pub fn at(&self, x: i32, y: i32, z: i32) -> T {
        self.data[self.index(x, y, z)]
    }

    /// Unchecked write for hot loops
    #[inline]
    pub fn set_at(&mut self, x: i32, y: i32, z: i32, value: T) {
        let i = self.index(x, y, z);
        self.data[i] = value;
    }

    /// Iterate over interior cells in storage order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let layout = self.row_layout();
        let interior = layout.interior();
        self.data
            .chunks(layout.stride.max(1))
            .enumerate()
            .filter(move |(row, _)| !self.data.is_empty() && layout.row_position(*row).is_some())
            .flat_map(move |(_, chunk)| chunk[interior.clone()].iter().copied())
    }
}

impl<T: Copy + PartialOrd> Volume<T> {
    /// Smallest and largest interior value, `None` for a dummy volume
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut it = self.iter();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| {
            (
                if v < lo { v } else { lo },
                if v > hi { v } else { hi },
            )
        }))
    }
}

impl<T: Copy + PartialEq> Volume<T> {
    /// Number of interior cells equal to `value`
    pub fn count_value(&self, value: T) -> usize {
        self.iter().filter(|&v| v == value).count()
    }
}
