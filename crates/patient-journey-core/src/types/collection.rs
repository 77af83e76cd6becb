//! Persisted collections and generation metadata.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::EventKind;

/// Every collection the pipeline reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Patients,
    Encounters,
    Conditions,
    Medications,
    Procedures,
    Observations,
    CompositeRecords,
    FeatureVectors,
    ClusterAssignments,
}

impl Collection {
    /// All collections, raw inputs first.
    pub const ALL: [Collection; 9] = [
        Collection::Patients,
        Collection::Encounters,
        Collection::Conditions,
        Collection::Medications,
        Collection::Procedures,
        Collection::Observations,
        Collection::CompositeRecords,
        Collection::FeatureVectors,
        Collection::ClusterAssignments,
    ];

    /// Collection holding raw events of `kind`.
    pub fn for_events(kind: EventKind) -> Self {
        match kind {
            EventKind::Encounter => Collection::Encounters,
            EventKind::Condition => Collection::Conditions,
            EventKind::Medication => Collection::Medications,
            EventKind::Procedure => Collection::Procedures,
            EventKind::Observation => Collection::Observations,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Patients => "patients",
            Collection::Encounters => "encounters",
            Collection::Conditions => "conditions",
            Collection::Medications => "medications",
            Collection::Procedures => "procedures",
            Collection::Observations => "observations",
            Collection::CompositeRecords => "composite_records",
            Collection::FeatureVectors => "feature_vectors",
            Collection::ClusterAssignments => "cluster_assignments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active generation of a persisted collection.
///
/// Every replace writes a new generation and repoints readers to it in one
/// atomic step; readers never observe a partially replaced collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMeta {
    pub collection: Collection,
    /// Monotonic generation number, starting at 1.
    pub generation: u64,
    /// Pipeline run that wrote this generation.
    pub run_id: Uuid,
    pub written_at: DateTime<Utc>,
    pub record_count: usize,
}

impl GenerationMeta {
    /// Metadata for the generation following `previous`.
    pub fn next(
        collection: Collection,
        previous: Option<&GenerationMeta>,
        run_id: Uuid,
        record_count: usize,
    ) -> Self {
        Self {
            collection,
            generation: previous.map_or(1, |p| p.generation + 1),
            run_id,
            written_at: Utc::now(),
            record_count,
        }
    }
}
