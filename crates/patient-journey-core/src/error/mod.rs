//! Error types for patient-journey-core.
//!
//! - [`PipelineError`]: fatal errors that abort a stage before any store write
//! - [`MalformedRecord`]: non-fatal warnings about individual records; they are
//!   counted and logged, never propagated
//!
//! # Propagation
//!
//! Structural and precondition failures abort the whole stage before its
//! replace call is issued. Malformed records are absorbed where they are found.
//!
//! ```rust
//! use patient_journey_core::error::{PipelineError, PipelineResult};
//! use patient_journey_core::types::Collection;
//!
//! fn require_rows(rows: &[u32]) -> PipelineResult<()> {
//!     if rows.is_empty() {
//!         return Err(PipelineError::data_absent(Collection::FeatureVectors, "nothing to cluster"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(require_rows(&[]), Err(PipelineError::DataAbsent { .. })));
//! ```

mod malformed;
mod unified;

#[cfg(test)]
mod tests;

pub use malformed::{MalformedKind, MalformedRecord};
pub use unified::{PipelineError, PipelineResult};
