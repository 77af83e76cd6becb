//! Patient Journey Core Library
//!
//! Turns raw per-patient clinical events into journey features and groups
//! patients into behavioral clusters.
//!
//! # Architecture
//!
//! Data flows strictly forward through three stages:
//!
//! 1. [`aggregation`]: flat events → one [`CompositePatientRecord`] per patient
//! 2. [`features`]: composite records → one [`FeatureVector`] per patient with
//!    a parseable encounter history
//! 3. [`clustering`]: feature vectors → standardized K-means labels, centers
//!    in original units and a silhouette score
//!
//! Persistence goes through the [`traits::PipelineStore`] capability, which
//! the [`pipeline::Pipeline`] runner receives explicitly for each run.
//!
//! # Example
//!
//! ```
//! use patient_journey_core::clustering::KMeansConfig;
//!
//! let config = KMeansConfig::default();
//! assert_eq!(config.k, 4);
//! assert_eq!(config.seed, 42);
//! assert_eq!(config.n_init, 10);
//! ```

pub mod aggregation;
pub mod clustering;
pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod stubs;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::PipelineConfig;
pub use error::{MalformedKind, MalformedRecord, PipelineError, PipelineResult};
pub use types::{
    ClusterAssignment, Collection, CompositePatientRecord, EventKind, FeatureVector,
    GenerationMeta, JourneyFeature, PatientId, RawEvent, FEATURE_DIM,
};
