//! Cluster count estimation
//!
//! When no cluster count is given, [`FuzzyCMeans`](crate::FuzzyCMeans)
//! asks a [`ClusterCountEstimator`] to pick one. The estimator receives a
//! callback that runs the full iteration for a given count, so it can try
//! as many counts as it needs and return the state it settles on.

use crate::error::ClusterResult;
use crate::fcm::ClusterState;

/// Default upper bound for [`PartitionCoefficientEstimator`]
pub const DEFAULT_MAX_CLUSTERS: usize = 8;

/// Strategy choosing the number of clusters
pub trait ClusterCountEstimator {
    /// Pick a clustering
    ///
    /// # Arguments
    ///
    /// * `limit` - Number of distinct density values, the largest useful count
    /// * `run` - Runs the clustering for a count
    fn estimate(
        &self,
        limit: usize,
        run: &mut dyn FnMut(usize) -> ClusterResult<ClusterState>,
    ) -> ClusterResult<ClusterState>;
}

/// Always uses the same count, clamped to the histogram limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedEstimator(pub usize);

impl ClusterCountEstimator for FixedEstimator {
    fn estimate(
        &self,
        limit: usize,
        run: &mut dyn FnMut(usize) -> ClusterResult<ClusterState>,
    ) -> ClusterResult<ClusterState> {
        run(self.0.clamp(1, limit.max(1)))
    }
}

/// Grows the count while the partition coefficient keeps improving
///
/// Counts `1, 2, ...` are tried in turn. The search stops at the first
/// count whose normalized partition coefficient drops below the previous
/// one or exceeds 1, and the previous clustering is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionCoefficientEstimator {
    pub max_clusters: usize,
}

impl Default for PartitionCoefficientEstimator {
    fn default() -> Self {
        Self {
            max_clusters: DEFAULT_MAX_CLUSTERS,
        }
    }
}

impl ClusterCountEstimator for PartitionCoefficientEstimator {
    fn estimate(
        &self,
        limit: usize,
        run: &mut dyn FnMut(usize) -> ClusterResult<ClusterState>,
    ) -> ClusterResult<ClusterState> {
        let limit = self.max_clusters.min(limit).max(1);
        let mut best = run(1)?;
        let mut best_pc = best.partition_coefficient();
        for k in 2..=limit {
            let state = run(k)?;
            let pc = state.partition_coefficient();
            log::debug!("partition coefficient for {} clusters: {:.6}", k, pc);
            if pc < best_pc || pc > 1.0 {
                break;
            }
            best = state;
            best_pc = pc;
        }
        Ok(best)
    }
}
