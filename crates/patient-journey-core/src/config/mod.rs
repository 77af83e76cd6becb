//! Root configuration for the patient journey pipeline.
//!
//! # Loading Configuration
//!
//! ```rust,ignore
//! use patient_journey_core::PipelineConfig;
//!
//! let config = PipelineConfig::from_file("journey.toml")?.with_env_overrides();
//! config.validate()?;
//! ```
//!
//! # TOML Structure
//!
//! ```toml
//! [clustering]
//! k = 4
//! n_init = 10
//! seed = 42
//! max_iterations = 300
//! tolerance = 1e-4
//!
//! [features]
//! negative_span = "reject"
//! journey_end = "latest_stop"
//!
//! [store]
//! path = "./patient_journey_db"
//! block_cache_mb = 64
//!
//! [retry]
//! max_attempts = 3
//! initial_backoff_ms = 200
//! max_backoff_ms = 2000
//! ```
//!
//! Missing sections fall back to their defaults. Invalid values are rejected
//! by [`PipelineConfig::validate`].

mod features;
mod store;


pub use features::{FeatureConfig, JourneyEndPolicy, NegativeSpanPolicy};
pub use store::{RetryPolicy, StoreSettings};

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clustering::KMeansConfig;
use crate::error::{PipelineError, PipelineResult};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PATIENT_JOURNEY_";

/// Root configuration aggregating every stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub clustering: KMeansConfig,

    #[serde(default)]
    pub features: FeatureConfig,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub retry: RetryPolicy,
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// - `PipelineError::Config` if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            PipelineError::config(format!(
                "Failed to parse TOML in '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> PipelineResult<Self> {
        toml::from_str(toml)
            .map_err(|e| PipelineError::config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> PipelineResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::config(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Validate all sections, returning the first error found.
    pub fn validate(&self) -> PipelineResult<()> {
        self.clustering
            .validate()
            .map_err(|e| PipelineError::config(format!("[clustering] {}", e)))?;
        self.store
            .validate()
            .map_err(|e| PipelineError::config(format!("[store] {}", e)))?;
        self.retry
            .validate()
            .map_err(|e| PipelineError::config(format!("[retry] {}", e)))?;
        Ok(())
    }

    /// Apply environment variable overrides.
    ///
    /// | Variable | Config Path |
    /// |----------|-------------|
    /// | `PATIENT_JOURNEY_K` | `clustering.k` |
    /// | `PATIENT_JOURNEY_SEED` | `clustering.seed` |
    /// | `PATIENT_JOURNEY_N_INIT` | `clustering.n_init` |
    /// | `PATIENT_JOURNEY_MAX_ITERATIONS` | `clustering.max_iterations` |
    /// | `PATIENT_JOURNEY_DB_PATH` | `store.path` |
    /// | `PATIENT_JOURNEY_NEGATIVE_SPAN_POLICY` | `features.negative_span` |
    /// | `PATIENT_JOURNEY_JOURNEY_END_POLICY` | `features.journey_end` |
    ///
    /// Values that fail to parse are ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(k) = env_parsed("K") {
            self.clustering.k = k;
        }
        if let Some(seed) = env_parsed("SEED") {
            self.clustering.seed = seed;
        }
        if let Some(n_init) = env_parsed("N_INIT") {
            self.clustering.n_init = n_init;
        }
        if let Some(max_iterations) = env_parsed("MAX_ITERATIONS") {
            self.clustering.max_iterations = max_iterations;
        }
        if let Ok(path) = env::var(format!("{}DB_PATH", ENV_PREFIX)) {
            self.store.path = PathBuf::from(path);
        }
        if let Some(policy) = env_parsed("NEGATIVE_SPAN_POLICY") {
            self.features.negative_span = policy;
        }
        if let Some(policy) = env_parsed("JOURNEY_END_POLICY") {
            self.features.journey_end = policy;
        }
        self
    }
}

fn env_parsed<T: FromStr>(suffix: &str) -> Option<T> {
    let name = format!("{}{}", ENV_PREFIX, suffix);
    let raw = env::var(&name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = %name, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}
