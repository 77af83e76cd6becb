//! Top-level pipeline error type.

use thiserror::Error;

use crate::types::Collection;

/// Fatal pipeline error.
///
/// # Recoverability
///
/// Only [`PipelineError::Connectivity`] is worth retrying; every other variant
/// needs different input or configuration.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The store could not be opened or reached.
    #[error("Store unreachable at '{location}': {message}")]
    Connectivity {
        /// Path or address of the store.
        location: String,
        message: String,
    },

    /// A required input collection or feature set is empty.
    #[error("No data in '{collection}': {context}")]
    DataAbsent {
        collection: Collection,
        context: String,
    },

    /// Algorithm precondition violated (cluster count vs distinct points,
    /// degenerate feature variance, non-finite input).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store read, write or serialization failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted data failed integrity checks on read.
    #[error("Corrupted data: {0}")]
    Corrupted(String),
}

impl PipelineError {
    /// Create a `DataAbsent` error.
    pub fn data_absent(collection: Collection, context: impl Into<String>) -> Self {
        Self::DataAbsent {
            collection,
            context: context.into(),
        }
    }

    /// Create a `Precondition` error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Create a `Config` error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a `Connectivity` error.
    pub fn connectivity(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connectivity {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Check if a retry could succeed.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// Short machine-readable category name, used in logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connectivity { .. } => "connectivity",
            Self::DataAbsent { .. } => "data_absent",
            Self::Precondition(_) => "precondition",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
            Self::Corrupted(_) => "corrupted",
        }
    }
}

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
