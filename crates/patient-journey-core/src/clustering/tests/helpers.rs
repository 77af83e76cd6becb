//! Helper functions for creating test data.

use chrono::{Duration, TimeZone, Utc};

use crate::types::{ClusterAssignment, FeatureVector, PatientId};

/// Build a feature vector with the given clustering features.
pub fn vector(id: &str, num_visits: u32, duration_days: i64, avg_gap_days: f64) -> FeatureVector {
    let journey_start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    FeatureVector {
        patient_id: PatientId::parse(id).unwrap(),
        num_visits,
        journey_start,
        journey_end: journey_start + Duration::days(duration_days),
        journey_duration_days: duration_days,
        avg_gap_days,
    }
}

/// Four tight, far-apart groups of ten patients.
///
/// Group `g` occupies indices `10 * g .. 10 * g + 10`.
pub fn four_blobs() -> Vec<FeatureVector> {
    let bases: [(u32, i64, f64); 4] = [(2, 10, 1.0), (40, 10, 1.0), (2, 1000, 1.0), (2, 10, 100.0)];
    let mut vectors = Vec::with_capacity(40);
    for (g, (visits, days, gap)) in bases.into_iter().enumerate() {
        for i in 0..10u32 {
            vectors.push(vector(
                &format!("g{}-p{:02}", g, i),
                visits + i % 2,
                days + i64::from(i),
                gap + 0.05 * f64::from(i),
            ));
        }
    }
    vectors
}

/// Assign labels to vectors in order.
pub fn assignments(vectors: Vec<FeatureVector>, labels: &[usize]) -> Vec<ClusterAssignment> {
    vectors
        .into_iter()
        .zip(labels)
        .map(|(features, &cluster)| ClusterAssignment { features, cluster })
        .collect()
}
