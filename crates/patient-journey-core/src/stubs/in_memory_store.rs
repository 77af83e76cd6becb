//! In-memory implementation of PipelineStore.
//!
//! # WARNING: TEST ONLY - DO NOT USE IN PRODUCTION
//!
//! No persistence: all data is lost when the store is dropped. For real runs
//! use `RocksDbJourneyStore` from `patient-journey-storage`.
//!
//! # Design
//!
//! - One `parking_lot::RwLock` guards every collection, so a replace is a
//!   single critical section and readers never see a half-written swap
//! - Write failures can be injected per collection to exercise the
//!   "failed replace keeps the previous generation" path

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{PipelineError, PipelineResult};
use crate::traits::{PipelineStore, StorageBackend};
use crate::types::{
    ClusterAssignment, Collection, CompositePatientRecord, EventKind, FeatureVector,
    GenerationMeta, RawEvent,
};

#[derive(Debug, Default)]
struct Collections {
    demographics: Vec<RawEvent>,
    events: BTreeMap<EventKind, Vec<RawEvent>>,
    composite_records: Vec<CompositePatientRecord>,
    feature_vectors: Vec<FeatureVector>,
    cluster_assignments: Vec<ClusterAssignment>,
    generations: BTreeMap<Collection, GenerationMeta>,
}

/// In-memory [`PipelineStore`].
///
/// # WARNING: TEST ONLY - DO NOT USE IN PRODUCTION
#[derive(Debug, Default)]
pub struct InMemoryPipelineStore {
    inner: RwLock<Collections>,
    failing: RwLock<BTreeSet<Collection>>,
}

impl InMemoryPipelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent replace of `collection` fail with
    /// `PipelineError::Storage`.
    pub fn fail_writes_to(&self, collection: Collection) {
        self.failing.write().insert(collection);
    }

    /// Undo [`InMemoryPipelineStore::fail_writes_to`].
    pub fn heal(&self, collection: Collection) {
        self.failing.write().remove(&collection);
    }

    fn swap<T: Clone>(
        &self,
        collection: Collection,
        run_id: Uuid,
        rows: &[T],
        slot: impl FnOnce(&mut Collections) -> &mut Vec<T>,
    ) -> PipelineResult<GenerationMeta> {
        if self.failing.read().contains(&collection) {
            return Err(PipelineError::Storage(format!(
                "injected write failure for '{}'",
                collection
            )));
        }

        let mut inner = self.inner.write();
        let meta = GenerationMeta::next(
            collection,
            inner.generations.get(&collection),
            run_id,
            rows.len(),
        );
        *slot(&mut *inner) = rows.to_vec();
        inner.generations.insert(collection, meta.clone());

        debug!(
            collection = %collection,
            generation = meta.generation,
            records = rows.len(),
            "in-memory collection replaced"
        );
        Ok(meta)
    }
}

impl PipelineStore for InMemoryPipelineStore {
    fn replace_demographics(
        &self,
        run_id: Uuid,
        records: &[RawEvent],
    ) -> PipelineResult<GenerationMeta> {
        self.swap(Collection::Patients, run_id, records, |c| &mut c.demographics)
    }

    fn load_demographics(&self) -> PipelineResult<Vec<RawEvent>> {
        Ok(self.inner.read().demographics.clone())
    }

    fn replace_events(
        &self,
        kind: EventKind,
        run_id: Uuid,
        events: &[RawEvent],
    ) -> PipelineResult<GenerationMeta> {
        self.swap(Collection::for_events(kind), run_id, events, |c| {
            c.events.entry(kind).or_default()
        })
    }

    fn load_events(&self, kind: EventKind) -> PipelineResult<Vec<RawEvent>> {
        Ok(self
            .inner
            .read()
            .events
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    fn replace_composite_records(
        &self,
        run_id: Uuid,
        records: &[CompositePatientRecord],
    ) -> PipelineResult<GenerationMeta> {
        self.swap(Collection::CompositeRecords, run_id, records, |c| {
            &mut c.composite_records
        })
    }

    fn load_composite_records(&self) -> PipelineResult<Vec<CompositePatientRecord>> {
        Ok(self.inner.read().composite_records.clone())
    }

    fn replace_feature_vectors(
        &self,
        run_id: Uuid,
        vectors: &[FeatureVector],
    ) -> PipelineResult<GenerationMeta> {
        self.swap(Collection::FeatureVectors, run_id, vectors, |c| {
            &mut c.feature_vectors
        })
    }

    fn load_feature_vectors(&self) -> PipelineResult<Vec<FeatureVector>> {
        Ok(self.inner.read().feature_vectors.clone())
    }

    fn replace_cluster_assignments(
        &self,
        run_id: Uuid,
        assignments: &[ClusterAssignment],
    ) -> PipelineResult<GenerationMeta> {
        self.swap(Collection::ClusterAssignments, run_id, assignments, |c| {
            &mut c.cluster_assignments
        })
    }

    fn load_cluster_assignments(&self) -> PipelineResult<Vec<ClusterAssignment>> {
        Ok(self.inner.read().cluster_assignments.clone())
    }

    fn generation(&self, collection: Collection) -> PipelineResult<Option<GenerationMeta>> {
        Ok(self.inner.read().generations.get(&collection).cloned())
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::InMemory
    }
}
