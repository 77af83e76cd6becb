//! Clustering algorithms and helper functions.
//!
//! Contains k-means++ initialization, the Lloyd loop and centroid
//! computation. All inputs are standardized rows.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::types::FEATURE_DIM;

use super::metrics::{euclidean_distance_squared, Point};

/// Outcome of a single k-means restart.
#[derive(Clone, Debug)]
pub(crate) struct LloydRun {
    pub labels: Vec<usize>,
    pub centroids: Vec<Point>,
    pub inertia: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Number of distinct rows, comparing exact bit patterns (`-0.0 == 0.0`).
pub(crate) fn count_distinct(rows: &[Point]) -> usize {
    rows.iter()
        .map(|row| row.map(|x| (x + 0.0).to_bits()))
        .collect::<HashSet<[u64; FEATURE_DIM]>>()
        .len()
}

/// Initialize centroids with k-means++.
///
/// The first centroid is drawn uniformly; each further one is drawn with
/// probability proportional to its squared distance from the nearest chosen
/// centroid.
pub(crate) fn kmeans_plus_plus_init(
    points: &[Point],
    k: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<Point> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)]);

    let mut min_distances = vec![f64::MAX; n];

    while centroids.len() < k {
        let last = centroids[centroids.len() - 1];
        for (dist, point) in min_distances.iter_mut().zip(points) {
            *dist = dist.min(euclidean_distance_squared(point, &last));
        }

        let total: f64 = min_distances.iter().sum();
        let next = if total > 0.0 {
            weighted_pick(&min_distances, total, rng)
        } else {
            // Every point coincides with a centroid; callers guarantee
            // k <= distinct points so this only guards against rounding.
            0
        };
        centroids.push(points[next]);
    }

    centroids
}

fn weighted_pick(weights: &[f64], total: f64, rng: &mut ChaCha8Rng) -> usize {
    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = i;
        if cumulative > target {
            return i;
        }
    }
    last_positive
}

/// Index of the nearest centroid. Ties go to the lowest index.
#[inline]
pub(crate) fn nearest_centroid(point: &Point, centroids: &[Point]) -> (usize, f64) {
    let mut best = (0, f64::MAX);
    for (j, centroid) in centroids.iter().enumerate() {
        let dist = euclidean_distance_squared(point, centroid);
        if dist < best.1 {
            best = (j, dist);
        }
    }
    best
}

/// Assign each point to its nearest centroid.
pub(crate) fn assign_points(points: &[Point], centroids: &[Point]) -> Vec<usize> {
    points
        .iter()
        .map(|p| nearest_centroid(p, centroids).0)
        .collect()
}

/// Compute new centroids as the mean of assigned points.
///
/// A cluster left without members is reseeded with the point farthest from
/// its current centroid; each point reseeds at most one cluster.
pub(crate) fn compute_centroids(
    points: &[Point],
    labels: &[usize],
    previous: &[Point],
) -> Vec<Point> {
    let k = previous.len();
    let mut sums = vec![[0.0; FEATURE_DIM]; k];
    let mut counts = vec![0usize; k];

    for (point, &cluster) in points.iter().zip(labels) {
        counts[cluster] += 1;
        for (s, x) in sums[cluster].iter_mut().zip(point) {
            *s += x;
        }
    }

    let empty: Vec<usize> = (0..k).filter(|&c| counts[c] == 0).collect();

    let mut centroids: Vec<Point> = sums
        .into_iter()
        .zip(&counts)
        .map(|(sum, &count)| {
            if count > 0 {
                sum.map(|s| s / count as f64)
            } else {
                sum
            }
        })
        .collect();

    if !empty.is_empty() {
        let mut by_distance: Vec<(usize, f64)> = points
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (p, &c))| (i, euclidean_distance_squared(p, &previous[c])))
            .collect();
        by_distance.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        for (cluster, (idx, _)) in empty.into_iter().zip(by_distance) {
            centroids[cluster] = points[idx];
        }
    }

    centroids
}

/// Within-cluster sum of squared distances.
pub(crate) fn compute_inertia(points: &[Point], labels: &[usize], centroids: &[Point]) -> f64 {
    points
        .iter()
        .zip(labels)
        .map(|(p, &c)| euclidean_distance_squared(p, &centroids[c]))
        .sum()
}

/// Run one seeded k-means restart.
///
/// Stops when assignments no longer change, when the summed squared centroid
/// shift drops to `tolerance`, or after `max_iterations` updates. The returned
/// labels always come from an assignment pass against the returned centroids.
pub(crate) fn run_lloyd(
    points: &[Point],
    k: usize,
    max_iterations: usize,
    tolerance: f64,
    rng: &mut ChaCha8Rng,
) -> LloydRun {
    let mut centroids = kmeans_plus_plus_init(points, k, rng);
    let mut labels = assign_points(points, &centroids);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        iterations += 1;

        let updated = compute_centroids(points, &labels, &centroids);
        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| euclidean_distance_squared(old, new))
            .sum();
        centroids = updated;

        let relabelled = assign_points(points, &centroids);
        let changed = relabelled != labels;
        labels = relabelled;

        if !changed || shift <= tolerance {
            converged = true;
            break;
        }
    }

    let inertia = compute_inertia(points, &labels, &centroids);
    LloydRun {
        labels,
        centroids,
        inertia,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_count_distinct_treats_signed_zero_equal() {
        let rows = [[0.0, 1.0, 2.0], [-0.0, 1.0, 2.0], [0.0, 1.0, 3.0]];
        assert_eq!(count_distinct(&rows), 2);
    }

    #[test]
    fn test_kmeans_plus_plus_picks_distinct_points() {
        let points = [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [5.0, 5.0, 5.0], [-5.0, 5.0, 0.0]];
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let centroids = kmeans_plus_plus_init(&points, 3, &mut rng);

        assert_eq!(count_distinct(&centroids), 3);
        println!("[VERIFIED] k-means++ never picks an already chosen point");
    }

    #[test]
    fn test_compute_centroids_reseeds_empty_cluster() {
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [10.0, 0.0, 0.0]];
        let labels = [0, 0, 0];
        let previous = [[0.0, 0.0, 0.0], [99.0, 99.0, 99.0]];

        let centroids = compute_centroids(&points, &labels, &previous);

        assert_eq!(centroids[0], [11.0 / 3.0, 0.0, 0.0]);
        assert_eq!(centroids[1], [10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_run_lloyd_separates_two_groups() {
        let points = [
            [0.0, 0.0, 0.0],
            [0.1, 0.0, 0.0],
            [10.0, 10.0, 10.0],
            [10.1, 10.0, 10.0],
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let run = run_lloyd(&points, 2, 100, 1e-4, &mut rng);

        assert!(run.converged);
        assert_eq!(run.labels[0], run.labels[1]);
        assert_eq!(run.labels[2], run.labels[3]);
        assert_ne!(run.labels[0], run.labels[2]);
        assert!(run.inertia < 0.02);
    }
}
