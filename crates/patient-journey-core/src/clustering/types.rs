//! Type definitions for clustering results.

use serde::{Deserialize, Serialize};

use crate::types::{ClusterAssignment, JourneyFeature};

use super::metrics::Point;
use super::scaler::StandardScaler;

/// One cluster center in original feature units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterCenter {
    /// Cluster label.
    pub cluster: usize,
    /// Center coordinates ordered as [`JourneyFeature::ALL`].
    pub values: Point,
    /// Number of patients labelled with this cluster.
    pub size: usize,
}

impl ClusterCenter {
    /// Coordinate for a single feature.
    #[inline]
    pub fn value(&self, feature: JourneyFeature) -> f64 {
        self.values[feature.index()]
    }
}

/// Full result of a clustering run.
#[derive(Clone, Debug)]
pub struct ClusteringOutcome {
    /// One assignment per input vector, in input order.
    pub assignments: Vec<ClusterAssignment>,

    /// Exactly `k` centers, indexed by label, in original units.
    pub centers: Vec<ClusterCenter>,

    /// Mean silhouette coefficient in standardized space, in `[-1, 1]`.
    pub silhouette: f64,

    /// Within-cluster sum of squares of the winning restart (standardized).
    pub inertia: f64,

    /// Lloyd iterations of the winning restart.
    pub iterations: usize,

    /// Whether the winning restart converged before `max_iterations`.
    pub converged: bool,

    /// Zero-based index of the winning restart.
    pub best_restart: usize,

    /// Column statistics used for standardization.
    pub scaler: StandardScaler,
}

impl ClusteringOutcome {
    /// Number of clusters.
    #[inline]
    pub fn k(&self) -> usize {
        self.centers.len()
    }

    /// Labels in input order.
    pub fn labels(&self) -> Vec<usize> {
        self.assignments.iter().map(|a| a.cluster).collect()
    }

    /// Serializable summary without per-patient rows.
    pub fn report(&self) -> ClusteringReport {
        ClusteringReport {
            k: self.k(),
            points: self.assignments.len(),
            silhouette: self.silhouette,
            inertia: self.inertia,
            iterations: self.iterations,
            converged: self.converged,
            best_restart: self.best_restart,
            centers: self.centers.clone(),
        }
    }
}

/// Run-level clustering figures, suitable for logs and JSON output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusteringReport {
    pub k: usize,
    pub points: usize,
    pub silhouette: f64,
    pub inertia: f64,
    pub iterations: usize,
    pub converged: bool,
    pub best_restart: usize,
    pub centers: Vec<ClusterCenter>,
}
