//! Storage backend identification.

use serde::{Deserialize, Serialize};

/// Storage implementation behind a [`PipelineStore`](super::PipelineStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageBackend {
    /// Process-local storage, lost on drop. Used for testing.
    InMemory,

    /// RocksDB with one column family per collection.
    RocksDb,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InMemory => write!(f, "InMemory"),
            Self::RocksDb => write!(f, "RocksDB"),
        }
    }
}
