//! Per-cluster reporting over persisted assignments.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::types::{ClusterAssignment, JourneyFeature, FEATURE_DIM};

/// Member count and mean features for one cluster, in original units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub cluster: usize,
    pub count: usize,
    pub mean_num_visits: f64,
    pub mean_journey_duration_days: f64,
    pub mean_avg_gap_days: f64,
}

/// Profiles for every cluster that has members, ordered by label.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub total: usize,
    pub clusters: Vec<ClusterProfile>,
}

impl ClusterSummary {
    /// Profile for one label.
    pub fn get(&self, cluster: usize) -> Option<&ClusterProfile> {
        self.clusters.iter().find(|p| p.cluster == cluster)
    }
}

/// Group assignments by label and average their features.
pub fn summarize(assignments: &[ClusterAssignment]) -> ClusterSummary {
    let mut groups: BTreeMap<usize, (usize, [f64; FEATURE_DIM])> = BTreeMap::new();
    for assignment in assignments {
        let (count, sums) = groups
            .entry(assignment.cluster)
            .or_insert((0, [0.0; FEATURE_DIM]));
        *count += 1;
        for (s, x) in sums.iter_mut().zip(assignment.features.feature_row()) {
            *s += x;
        }
    }

    let clusters = groups
        .into_iter()
        .map(|(cluster, (count, sums))| {
            let mean = |f: JourneyFeature| sums[f.index()] / count as f64;
            ClusterProfile {
                cluster,
                count,
                mean_num_visits: mean(JourneyFeature::NumVisits),
                mean_journey_duration_days: mean(JourneyFeature::JourneyDurationDays),
                mean_avg_gap_days: mean(JourneyFeature::AvgGapDays),
            }
        })
        .collect();

    ClusterSummary {
        total: assignments.len(),
        clusters,
    }
}

/// Pick one member per cluster, reproducibly for a given seed.
///
/// Members are ordered by patient id before drawing, so the pick does not
/// depend on storage order. Results are ordered by label.
pub fn sample_per_cluster(assignments: &[ClusterAssignment], seed: u64) -> Vec<ClusterAssignment> {
    let mut groups: BTreeMap<usize, Vec<&ClusterAssignment>> = BTreeMap::new();
    for assignment in assignments {
        groups.entry(assignment.cluster).or_default().push(assignment);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    groups
        .into_values()
        .filter_map(|mut members| {
            members.sort_by(|a, b| a.patient_id().cmp(b.patient_id()));
            members.choose(&mut rng).map(|a| (*a).clone())
        })
        .collect()
}
