//! Core trait definitions for the patient journey pipeline.
//!
//! # Traits
//!
//! - [`PipelineStore`]: generation-swapped persistence for every collection

mod backend;
mod pipeline_store;

pub use backend::StorageBackend;
pub use pipeline_store::PipelineStore;
