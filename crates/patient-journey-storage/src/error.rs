//! Storage error types.
//!
//! Every error carries the operation, column family and key involved so a
//! failure can be traced without a debugger.

use patient_journey_core::PipelineError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database failed to open (bad path, permissions, or held by another run).
    #[error("Failed to open database at '{path}': {message}")]
    OpenFailed { path: String, message: String },

    /// Column family not found in the database.
    #[error("Column family '{name}' not found")]
    ColumnFamilyNotFound { name: String },

    /// RocksDB operation failed.
    #[error("RocksDB {operation} failed on CF '{cf}': {source}")]
    RocksDbOperation {
        operation: &'static str,
        cf: &'static str,
        #[source]
        source: rocksdb::Error,
    },

    /// Serialization failed before writing.
    #[error("Serialization error for {type_name}: {message}")]
    Serialization {
        type_name: &'static str,
        message: String,
    },

    /// Stored bytes could not be decoded.
    #[error("Deserialization error for key '{key}' in CF '{cf}': {message}")]
    Deserialization {
        cf: &'static str,
        key: String,
        message: String,
    },

    /// Stored value was written by an incompatible layout version.
    #[error("Version mismatch in CF '{cf}': expected {expected}, got {actual}")]
    VersionMismatch {
        cf: &'static str,
        expected: u8,
        actual: u8,
    },

    /// A row key has the wrong length.
    #[error("Malformed key in CF '{cf}': expected {expected} bytes, got {actual}")]
    MalformedKey {
        cf: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The active generation holds a different number of rows than recorded.
    #[error(
        "Generation {generation} of '{cf}' has {actual} rows, pointer records {expected}"
    )]
    RowCountMismatch {
        cf: &'static str,
        generation: u64,
        expected: usize,
        actual: usize,
    },
}

impl StorageError {
    pub(crate) fn rocksdb_op(
        operation: &'static str,
        cf: &'static str,
        source: rocksdb::Error,
    ) -> Self {
        Self::RocksDbOperation {
            operation,
            cf,
            source,
        }
    }

    /// True when the stored data itself is unreadable.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::Deserialization { .. }
                | Self::VersionMismatch { .. }
                | Self::MalformedKey { .. }
                | Self::RowCountMismatch { .. }
        )
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for PipelineError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::OpenFailed { path, message } => PipelineError::connectivity(path, message),
            e if e.is_corruption() => PipelineError::Corrupted(e.to_string()),
            e => PipelineError::Storage(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_failure_maps_to_connectivity() {
        let err: PipelineError = StorageError::OpenFailed {
            path: "/tmp/db".to_string(),
            message: "lock held".to_string(),
        }
        .into();

        assert!(err.is_retryable());
        assert!(err.to_string().contains("/tmp/db"));
        println!("[VERIFIED] OpenFailed -> Connectivity: {}", err);
    }

    #[test]
    fn test_decode_failures_map_to_corrupted() {
        let err: PipelineError = StorageError::VersionMismatch {
            cf: "feature_vectors",
            expected: 1,
            actual: 9,
        }
        .into();
        assert!(matches!(err, PipelineError::Corrupted(_)));

        let err: PipelineError = StorageError::RowCountMismatch {
            cf: "patients",
            generation: 3,
            expected: 10,
            actual: 4,
        }
        .into();
        assert!(matches!(err, PipelineError::Corrupted(_)));
    }

    #[test]
    fn test_other_failures_map_to_storage() {
        let err: PipelineError = StorageError::ColumnFamilyNotFound {
            name: "nope".to_string(),
        }
        .into();
        assert!(matches!(err, PipelineError::Storage(_)));
        assert!(!err.is_retryable());
    }
}
