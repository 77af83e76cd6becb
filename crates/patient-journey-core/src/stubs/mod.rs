//! Test doubles for core traits.
//!
//! - [`InMemoryPipelineStore`]: process-local [`PipelineStore`](crate::traits::PipelineStore)

mod in_memory_store;

pub use in_memory_store::InMemoryPipelineStore;
