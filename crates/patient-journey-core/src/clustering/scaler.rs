//! Per-column standardization.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{JourneyFeature, FEATURE_DIM};

use super::metrics::Point;

/// Relative threshold under which a column counts as constant.
const ZERO_VARIANCE_EPSILON: f64 = 1e-12;

/// Zero-mean / unit-variance scaler using the population standard deviation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Point,
    pub scale: Point,
}

impl StandardScaler {
    /// Fit column statistics.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Precondition` if `rows` is empty or a column has zero
    ///   variance (standardization would divide by zero)
    pub fn fit(rows: &[Point]) -> PipelineResult<Self> {
        if rows.is_empty() {
            return Err(PipelineError::precondition(
                "cannot fit scaler on an empty matrix",
            ));
        }
        let n = rows.len() as f64;

        let mut mean = [0.0; FEATURE_DIM];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut scale = [0.0; FEATURE_DIM];
        for row in rows {
            for d in 0..FEATURE_DIM {
                let diff = row[d] - mean[d];
                scale[d] += diff * diff;
            }
        }

        for feature in JourneyFeature::ALL {
            let d = feature.index();
            scale[d] = (scale[d] / n).sqrt();
            if scale[d] <= ZERO_VARIANCE_EPSILON * mean[d].abs().max(1.0) {
                return Err(PipelineError::precondition(format!(
                    "feature '{}' has zero variance (every patient has {}); \
                     cannot standardize",
                    feature, mean[d]
                )));
            }
        }

        Ok(Self { mean, scale })
    }

    /// Standardize one row.
    #[inline]
    pub fn transform(&self, row: &Point) -> Point {
        std::array::from_fn(|d| (row[d] - self.mean[d]) / self.scale[d])
    }

    /// Map a standardized row back into original units.
    #[inline]
    pub fn inverse_transform(&self, row: &Point) -> Point {
        std::array::from_fn(|d| row[d] * self.scale[d] + self.mean[d])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_uses_population_std() {
        let rows = [[1.0, 10.0, 0.0], [3.0, 20.0, 2.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();

        assert_eq!(scaler.mean, [2.0, 15.0, 1.0]);
        assert_eq!(scaler.scale, [1.0, 5.0, 1.0]);
        assert_eq!(scaler.transform(&rows[0]), [-1.0, -1.0, -1.0]);

        println!("[VERIFIED] Scaler uses population standard deviation");
    }

    #[test]
    fn test_inverse_transform_restores_units() {
        let rows = [[1.0, 0.0, 5.0], [4.0, 30.0, 5.5], [9.0, 12.0, 7.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();

        for row in &rows {
            let back = scaler.inverse_transform(&scaler.transform(row));
            for d in 0..FEATURE_DIM {
                assert!((back[d] - row[d]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_variance_column_is_precondition() {
        let rows = [[1.0, 5.0, 0.0], [2.0, 6.0, 0.0]];
        let err = StandardScaler::fit(&rows).unwrap_err();

        assert!(matches!(err, PipelineError::Precondition(_)));
        assert!(err.to_string().contains("avg_gap_days"));
    }
}
