//! Standardized K-means clustering of patient journeys.
//!
//! # Fail-Fast
//!
//! Clustering failures are fatal and returned before anything is persisted.
//! No partial results are produced.
//!
//! # Algorithm
//!
//! 1. Standardize each feature column to zero mean and unit population variance
//! 2. Seed `k` centroids with k-means++ from a `ChaCha8Rng` seeded by `seed`
//! 3. Lloyd iterations: assign to nearest centroid, recompute means
//! 4. Repeat steps 2-3 `n_init` times and keep the lowest inertia
//! 5. Score with the mean silhouette coefficient
//! 6. Map centers back to original feature units
//!
//! # Validation
//!
//! - feature vectors must not be empty
//! - k must be >= 2 and <= number of distinct points
//! - every feature column needs non-zero variance
//! - every feature value must be finite

mod algorithms;
mod clusterer;
mod config;
mod metrics;
mod scaler;
mod silhouette;
mod summary;
#[cfg(test)]
mod tests;
mod types;

pub use clusterer::{JourneyClusterer, StandardKMeans};
pub use config::KMeansConfig;
pub use metrics::Point;
pub use scaler::StandardScaler;
pub use silhouette::silhouette_score;
pub use summary::{sample_per_cluster, summarize, ClusterProfile, ClusterSummary};
pub use types::{ClusterCenter, ClusteringOutcome, ClusteringReport};
