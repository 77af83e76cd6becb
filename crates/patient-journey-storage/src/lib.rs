//! Patient Journey Storage Layer
//!
//! RocksDB-backed implementation of
//! [`PipelineStore`](patient_journey_core::traits::PipelineStore).
//!
//! # Column Families
//!
//! One column family per [`Collection`](patient_journey_core::Collection)
//! holds versioned bincode rows keyed by `generation ++ index`; the
//! `generations` column family holds the active
//! [`GenerationMeta`](patient_journey_core::GenerationMeta) of each collection.
//!
//! # Replace Semantics
//!
//! A replace writes every row of the new generation together with the
//! generation pointer in one `WriteBatch`, then purges older generations.
//! Readers only follow the pointer, so a crash between the two steps leaves
//! unreachable rows behind, never a mixed collection.
//!
//! # Example
//!
//! ```rust,ignore
//! use patient_journey_storage::RocksDbJourneyStore;
//! use patient_journey_core::traits::PipelineStore;
//!
//! let store = RocksDbJourneyStore::open("./patient_journey_db")?;
//! let vectors = store.load_feature_vectors()?;
//! ```

pub mod column_families;
pub mod error;
pub mod rocksdb_store;
pub mod schema;

pub use error::{StorageError, StorageResult};
pub use rocksdb_store::{open_with_retry, RocksDbJourneyStore, RocksDbStoreConfig};
