//! Distance metrics for clustering.

use crate::types::FEATURE_DIM;

/// A row of the feature matrix.
pub type Point = [f64; FEATURE_DIM];

/// Squared Euclidean distance. Use for comparisons.
#[inline]
pub(crate) fn euclidean_distance_squared(a: &Point, b: &Point) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Euclidean distance.
#[inline]
pub(crate) fn euclidean_distance(a: &Point, b: &Point) -> f64 {
    euclidean_distance_squared(a, b).sqrt()
}
