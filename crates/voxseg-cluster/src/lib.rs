//! voxseg-cluster - Fuzzy c-means segmentation of density volumes
//!
//! Clusters the density histogram of a volume, turns the cluster centers
//! into thresholds and relabels the volume with ids taken from a
//! [`RegionRegistry`]. [`GaussianMixture`] models sampled densities for
//! trained segmentation.
//!
//! # Features
//!
//! - `rayon` - Parallel membership updates and relabeling

pub mod em;
pub mod error;
pub mod estimate;
pub mod fcm;
pub mod registry;
pub mod segment;

pub use em::{EmOptions, GaussianComponent, GaussianMixture};
pub use error::{ClusterError, ClusterResult};
pub use estimate::{
    ClusterCountEstimator, DEFAULT_MAX_CLUSTERS, FixedEstimator, PartitionCoefficientEstimator,
};
pub use fcm::{
    ClusterCount, ClusterFit, ClusterOutcome, ClusterState, FcmOptions, FcmRun, FuzzyCMeans,
};
pub use registry::{FIRST_AUTOMATIC_ID, RegionRegistry};
pub use segment::{label_for, segment_with_thresholds, segment_within_label};
