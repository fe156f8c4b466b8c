use crate::error::{Error, Result};

/// 2D grid with a border margin
///
/// The 2D counterpart of [`Volume`](crate::grid::Volume): same margin
/// convention, same dummy state, same checked and unchecked accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    data: Vec<T>,
    x_size: u32,
    y_size: u32,
    margin: u32,
}

impl<T: Copy + Default> Plane<T> {
    /// Create a plane filled with `T::default()`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either side is zero.
    pub fn new(x_size: u32, y_size: u32, margin: u32) -> Result<Self> {
        Self::new_with_value(x_size, y_size, margin, T::default())
    }

    /// Create a plane with every cell, margin included, set to `value`
    pub fn new_with_value(x_size: u32, y_size: u32, margin: u32, value: T) -> Result<Self> {
        let len = Self::checked_len(x_size, y_size, margin)?;
        Ok(Self {
            data: vec![value; len],
            x_size,
            y_size,
            margin,
        })
    }

    /// Zero-size plane meaning "no data yet"
    pub fn dummy() -> Self {
        Self {
            data: Vec::new(),
            x_size: 0,
            y_size: 0,
            margin: 0,
        }
    }

    /// Build a plane from interior values given row by row
    ///
    /// # Errors
    ///
    /// Returns an error if `values.len() != x_size * y_size`.
    pub fn from_rows(x_size: u32, y_size: u32, margin: u32, values: &[T]) -> Result<Self> {
        let expected = x_size as usize * y_size as usize;
        if values.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "expected {} values for a {}x{} plane, got {}",
                expected,
                x_size,
                y_size,
                values.len()
            )));
        }
        let mut plane = Self::new(x_size, y_size, margin)?;
        for (y, row) in values.chunks(x_size as usize).enumerate() {
            plane.row_mut(y as i32).copy_from_slice(row);
        }
        Ok(plane)
    }

    /// Reallocate to a new size; all contents are cleared
    pub fn resize(&mut self, x_size: u32, y_size: u32, margin: u32) -> Result<()> {
        if x_size == 0 || y_size == 0 {
            *self = Self::dummy();
            return Ok(());
        }
        let len = Self::checked_len(x_size, y_size, margin)?;
        self.data.clear();
        self.data.resize(len, T::default());
        self.x_size = x_size;
        self.y_size = y_size;
        self.margin = margin;
        Ok(())
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Set only the cells of the border ring
    pub fn fill_margin(&mut self, value: T) {
        if self.margin == 0 || self.is_dummy() {
            return;
        }
        let m = self.margin as usize;
        let stride = self.stride();
        let rows = self.y_size as usize;
        for (row, chunk) in self.data.chunks_mut(stride).enumerate() {
            if row < m || row >= m + rows {
                chunk.fill(value);
            } else {
                chunk[..m].fill(value);
                chunk[stride - m..].fill(value);
            }
        }
    }

    fn checked_len(x_size: u32, y_size: u32, margin: u32) -> Result<usize> {
        let invalid = Error::InvalidDimension {
            x: x_size,
            y: y_size,
            z: 1,
        };
        if x_size == 0 || y_size == 0 {
            return Err(invalid);
        }
        let pad = |s: u32| {
            s.checked_add(margin.checked_mul(2)?)
                .filter(|&p| p <= i32::MAX as u32)
                .map(|p| p as usize)
        };
        pad(x_size)
            .zip(pad(y_size))
            .and_then(|(a, b)| a.checked_mul(b))
            .ok_or(invalid)
    }
}

impl<T> Plane<T> {
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

    /// Extent `(x, y)`, margin excluded
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.x_size, self.y_size)
    }

    #[inline]
    pub fn margin(&self) -> u32 {
        self.margin
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.x_size as usize * self.y_size as usize
    }

    pub fn same_size<U>(&self, other: &Plane<U>) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Check whether `(x, y)` is inside the extent, margin excluded
    #[inline]
    pub fn is_in(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.x_size as i32 && y < self.y_size as i32
    }

    /// Check whether `(x, y)` is addressable, margin included
    #[inline]
    pub fn contains_with_margin(&self, x: i32, y: i32) -> bool {
        if self.is_dummy() {
            return false;
        }
        let m = self.margin as i32;
        x >= -m && y >= -m && x < self.x_size as i32 + m && y < self.y_size as i32 + m
    }

    #[inline]
    fn stride(&self) -> usize {
        (self.x_size + 2 * self.margin) as usize
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(
            self.contains_with_margin(x, y),
            "pixel ({}, {}) outside {:?} with margin {}",
            x,
            y,
            self.dimensions(),
            self.margin
        );
        let m = self.margin as i32;
        (y + m) as usize * self.stride() + (x + m) as usize
    }

    /// Interior cells of row `y`
    pub fn row(&self, y: i32) -> &[T] {
        let start = self.index(0, y);
        &self.data[start..start + self.x_size as usize]
    }

    /// Mutable interior cells of row `y`
    pub fn row_mut(&mut self, y: i32) -> &mut [T] {
        let start = self.index(0, y);
        let len = self.x_size as usize;
        &mut self.data[start..start + len]
    }
}

impl<T: Copy> Plane<T> {
    /// Checked read, margin included
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        if self.contains_with_margin(x, y) {
            Some(self.data[self.index(x, y)])
        } else {
            None
        }
    }

    /// Checked write, margin included
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinateOutOfBounds`] outside the margin.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> Result<()> {
        if !self.contains_with_margin(x, y) {
            return Err(Error::CoordinateOutOfBounds { x, y, z: 0 });
        }
        let i = self.index(x, y);
        self.data[i] = value;
        Ok(())
    }

    #[inline]
    pub fn at(&self, x: i32, y: i32) -> T {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set_at(&mut self, x: i32, y: i32, value: T) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    /// Iterate over interior cells, row by row
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.y_size as i32).flat_map(move |y| self.row(y).iter().copied())
    }
}

impl<T: Copy + PartialOrd> Plane<T> {
    /// Smallest and largest interior value
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

impl<T: Copy + PartialEq> Plane<T> {
    /// Number of interior cells equal to `value`
    pub fn count_value(&self, value: T) -> usize {
        self.iter().filter(|&v| v == value).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_new() {
        let p: Plane<u16> = Plane::new(5, 4, 1).unwrap();
        assert_eq!(p.dimensions(), (5, 4));
        assert_eq!(p.pixel_count(), 20);
        assert!(Plane::<u16>::new(0, 4, 1).is_err());
    }

    #[test]
    fn test_plane_from_rows() {
        let p = Plane::from_rows(3, 2, 1, &[1u16, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(p.at(2, 0), 3);
        assert_eq!(p.at(0, 1), 4);
        assert_eq!(p.get(-1, -1), Some(0));
        assert!(Plane::from_rows(3, 2, 0, &[1u16, 2]).is_err());
    }

    #[test]
    fn test_plane_fill_margin() {
        let mut p: Plane<u16> = Plane::new(2, 2, 1).unwrap();
        p.fill_margin(7);
        assert_eq!(p.count_value(7), 0);
        assert_eq!(p.at(-1, 0), 7);
        assert_eq!(p.at(2, 1), 7);
        assert_eq!(p.at(0, 2), 7);
        assert_eq!(p.at(1, 1), 0);
    }

    #[test]
    fn test_plane_dummy() {
        let p = Plane::<i16>::dummy();
        assert!(p.is_dummy());
        assert_eq!(p.iter().count(), 0);
        assert!(!p.contains_with_margin(0, 0));
    }
}
