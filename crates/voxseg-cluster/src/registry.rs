//! Region id registry
//!
//! Tracks which region ids are taken. Ids a caller reserves (manually
//! painted regions, typically) are never handed out by [`allocate`], which
//! always returns one contiguous block so clustering can label voxels as
//! `base + cluster index`.
//!
//! [`allocate`]: RegionRegistry::allocate

use crate::error::{ClusterError, ClusterResult};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use voxseg_core::{RegionPixel, UNLABELED};

/// First id handed out by [`RegionRegistry::default`]
pub const FIRST_AUTOMATIC_ID: RegionPixel = 1;

#[derive(Debug, Clone)]
pub struct RegionRegistry {
    first_auto: RegionPixel,
    reserved: BTreeSet<RegionPixel>,
    automatic: BTreeSet<RegionPixel>,
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::new(FIRST_AUTOMATIC_ID)
    }
}

impl RegionRegistry {
    /// Registry allocating automatic ids from `first_auto` upward
    ///
    /// [`UNLABELED`] is never allocated, so a `first_auto` of 0 behaves
    /// like 1.
    pub fn new(first_auto: RegionPixel) -> Self {
        Self {
            first_auto: first_auto.max(UNLABELED + 1),
            reserved: BTreeSet::new(),
            automatic: BTreeSet::new(),
        }
    }

    pub fn first_automatic(&self) -> RegionPixel {
        self.first_auto
    }

    /// Mark `id` as manually assigned
    ///
    /// Returns `false` if the id was already reserved or is [`UNLABELED`].
    pub fn reserve(&mut self, id: RegionPixel) -> bool {
        if id == UNLABELED {
            return false;
        }
        self.automatic.remove(&id);
        self.reserved.insert(id)
    }

    pub fn is_reserved(&self, id: RegionPixel) -> bool {
        self.reserved.contains(&id)
    }

    pub fn is_automatic(&self, id: RegionPixel) -> bool {
        self.automatic.contains(&id)
    }

    /// Whether `id` is held by either kind of assignment
    pub fn is_used(&self, id: RegionPixel) -> bool {
        self.is_reserved(id) || self.is_automatic(id)
    }

    /// Allocate `count` consecutive free ids
    ///
    /// The lowest block at or above the first automatic id that holds no
    /// used id is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidParameters`] for a zero count and
    /// [`ClusterError::RegionIdsExhausted`] if no such block fits below
    /// `RegionPixel::MAX`.
    pub fn allocate(&mut self, count: usize) -> ClusterResult<RangeInclusive<RegionPixel>> {
        if count == 0 {
            return Err(ClusterError::InvalidParameters(
                "cannot allocate zero region ids".into(),
            ));
        }
        let first = self.first_auto;
        let exhausted = || ClusterError::RegionIdsExhausted {
            requested: count,
            first,
        };
        let span = RegionPixel::try_from(count - 1).map_err(|_| exhausted())?;

        let mut start = self.first_auto;
        loop {
            let Some(end) = start.checked_add(span) else {
                return Err(exhausted());
            };
            // First used id inside the candidate block, if any
            let blocker = self
                .reserved
                .range(start..=end)
                .chain(self.automatic.range(start..=end))
                .max()
                .copied();
            match blocker {
                None => {
                    self.automatic.extend(start..=end);
                    log::debug!("allocated region ids {}..={}", start, end);
                    return Ok(start..=end);
                }
                Some(used) => match used.checked_add(1) {
                    Some(next) => start = next,
                    None => return Err(exhausted()),
                },
            }
        }
    }

    /// Forget every automatically allocated id
    pub fn release_all_automatic(&mut self) {
        self.automatic.clear();
    }

    /// Ids currently reserved, in ascending order
    pub fn reserved(&self) -> impl Iterator<Item = RegionPixel> + '_ {
        self.reserved.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_contiguous() {
        let mut reg = RegionRegistry::default();
        assert_eq!(reg.allocate(3).unwrap(), 1..=3);
        assert_eq!(reg.allocate(2).unwrap(), 4..=5);
        assert!(reg.is_automatic(2));
        assert!(!reg.is_reserved(2));
    }

    #[test]
    fn test_allocate_skips_reserved() {
        let mut reg = RegionRegistry::new(1);
        assert!(reg.reserve(3));
        assert!(!reg.reserve(3));
        assert!(!reg.reserve(UNLABELED));
        assert_eq!(reg.allocate(2).unwrap(), 1..=2);
        assert_eq!(reg.allocate(2).unwrap(), 4..=5);
        assert_eq!(reg.allocate(1).unwrap(), 6..=6);
    }

    #[test]
    fn test_release_automatic_keeps_reserved() {
        let mut reg = RegionRegistry::new(10);
        reg.reserve(11);
        assert_eq!(reg.allocate(3).unwrap(), 12..=14);
        reg.release_all_automatic();
        assert!(!reg.is_used(12));
        assert!(reg.is_used(11));
        assert_eq!(reg.allocate(1).unwrap(), 10..=10);
        assert_eq!(reg.reserved().collect::<Vec<_>>(), vec![11]);
    }

    #[test]
    fn test_exhausted() {
        let mut reg = RegionRegistry::new(RegionPixel::MAX - 1);
        assert!(matches!(
            reg.allocate(3),
            Err(ClusterError::RegionIdsExhausted { requested: 3, .. })
        ));
        assert_eq!(reg.allocate(2).unwrap(), RegionPixel::MAX - 1..=RegionPixel::MAX);
        assert!(reg.allocate(1).is_err());
        assert!(matches!(reg.allocate(0), Err(ClusterError::InvalidParameters(_))));
    }
}
