//! Configuration for K-means clustering.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Configuration for K-means clustering.
///
/// # Defaults
///
/// `k = 4`, `n_init = 10`, `seed = 42`, `max_iterations = 300`,
/// `tolerance = 1e-4`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of clusters.
    ///
    /// Must be >= 2 and never adjusted to fit the data.
    pub k: usize,

    /// Independent k-means++ restarts. The lowest-inertia run wins.
    pub n_init: usize,

    /// Seed for k-means++ initialization.
    pub seed: u64,

    /// Lloyd iterations per restart.
    pub max_iterations: usize,

    /// Convergence threshold on the summed squared centroid shift,
    /// measured in standardized units.
    pub tolerance: f64,
}

impl KMeansConfig {
    /// Create a validated configuration with default iteration limits.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Config` if any parameter is invalid.
    pub fn new(k: usize, n_init: usize, seed: u64) -> PipelineResult<Self> {
        let config = Self {
            k,
            n_init,
            seed,
            ..Self::default()
        };
        config.validate().map_err(PipelineError::config)?;
        Ok(config)
    }

    /// Default configuration with a different `k`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Config` if `k < 2`.
    pub fn with_k(k: usize) -> PipelineResult<Self> {
        Self::new(k, 10, 42)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.k < 2 {
            return Err(format!("k must be >= 2, got {}", self.k));
        }
        if self.n_init == 0 {
            return Err("n_init must be > 0".to_string());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0".to_string());
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(format!(
                "tolerance must be a finite positive number, got {}",
                self.tolerance
            ));
        }
        Ok(())
    }
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 4,
            n_init: 10,
            seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}
