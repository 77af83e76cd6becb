//! Silhouette coefficient.

use super::metrics::{euclidean_distance, Point};

/// Mean silhouette coefficient over all points.
///
/// For a point in cluster `A` with mean intra-cluster distance `a` and lowest
/// mean distance `b` to another non-empty cluster, `s = (b - a) / max(a, b)`.
/// Points in singleton clusters score 0, as do points when no other cluster
/// has members. The result lies in `[-1, 1]`.
pub fn silhouette_score(points: &[Point], labels: &[usize], k: usize) -> f64 {
    let n = points.len();
    if n == 0 || labels.len() != n {
        return 0.0;
    }

    let mut sizes = vec![0usize; k];
    for &label in labels {
        sizes[label] += 1;
    }

    let mut total = 0.0;
    let mut sums = vec![0.0; k];
    for i in 0..n {
        let own = labels[i];
        if sizes[own] <= 1 {
            continue;
        }

        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                sums[labels[j]] += euclidean_distance(&points[i], &points[j]);
            }
        }

        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        if b.is_finite() {
            total += score(a, b);
        }
    }

    (total / n as f64).clamp(-1.0, 1.0)
}

#[inline]
fn score(a: f64, b: f64) -> f64 {
    let denom = a.max(b);
    if denom > 0.0 {
        (b - a) / denom
    } else {
        0.0
    }
}
