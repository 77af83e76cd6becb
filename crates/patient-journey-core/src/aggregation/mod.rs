//! Event aggregation: flat clinical events → one composite record per patient.
//!
//! # Grouping Rules
//!
//! - One [`CompositePatientRecord`](crate::types::CompositePatientRecord) per
//!   demographic entry, keyed by its `Id`
//! - Events join the record whose id equals their `PATIENT` field
//! - Events without a `PATIENT` value go to the visible
//!   [`EventTally`] of unassigned events, never to a shared null key
//! - Events pointing at an unknown patient are counted as orphans
//!
//! Aggregation is not additive: persisting the outcome replaces every
//! previously stored composite record.

mod aggregator;
mod types;

pub use aggregator::aggregate_events;
pub use types::{AggregationOutcome, AggregationStats, EventBatch, EventTally};
