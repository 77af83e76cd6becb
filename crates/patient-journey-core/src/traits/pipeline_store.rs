//! Persistence contract shared by every pipeline stage.

use uuid::Uuid;

use crate::error::PipelineResult;
use crate::types::{
    ClusterAssignment, Collection, CompositePatientRecord, EventKind, FeatureVector,
    GenerationMeta, RawEvent,
};

use super::backend::StorageBackend;

/// Storage for raw and derived pipeline collections.
///
/// Every `replace_*` call swaps a whole collection: the new rows become a new
/// generation, readers see either the old or the new generation in full, and
/// the old generation is purged afterwards. A failed replace leaves the
/// previous generation untouched.
///
/// Loading a collection that was never written returns an empty `Vec`;
/// deciding whether empty input is an error is up to the caller.
///
/// # Implementation Notes
///
/// - Methods take `&self`; implementations handle their own synchronization
/// - `run_id` is recorded in the collection's [`GenerationMeta`]
/// - Implementations log failures via `tracing` before returning
///
/// # Example
///
/// ```
/// use patient_journey_core::stubs::InMemoryPipelineStore;
/// use patient_journey_core::traits::PipelineStore;
/// use patient_journey_core::{Collection, RawEvent};
/// use uuid::Uuid;
///
/// let store = InMemoryPipelineStore::new();
/// let demo = RawEvent::new().with("Id", "p1");
/// let meta = store.replace_demographics(Uuid::new_v4(), &[demo]).unwrap();
///
/// assert_eq!(meta.generation, 1);
/// assert_eq!(store.load_demographics().unwrap().len(), 1);
/// assert_eq!(store.generation(Collection::Patients).unwrap(), Some(meta));
/// ```
pub trait PipelineStore: Send + Sync {
    // ==================== Raw Collections ====================

    /// Replace all demographic records.
    fn replace_demographics(
        &self,
        run_id: Uuid,
        records: &[RawEvent],
    ) -> PipelineResult<GenerationMeta>;

    /// Load all demographic records.
    fn load_demographics(&self) -> PipelineResult<Vec<RawEvent>>;

    /// Replace all events of one kind.
    fn replace_events(
        &self,
        kind: EventKind,
        run_id: Uuid,
        events: &[RawEvent],
    ) -> PipelineResult<GenerationMeta>;

    /// Load all events of one kind.
    fn load_events(&self, kind: EventKind) -> PipelineResult<Vec<RawEvent>>;

    // ==================== Derived Collections ====================

    /// Replace all composite patient records.
    fn replace_composite_records(
        &self,
        run_id: Uuid,
        records: &[CompositePatientRecord],
    ) -> PipelineResult<GenerationMeta>;

    /// Load all composite patient records.
    fn load_composite_records(&self) -> PipelineResult<Vec<CompositePatientRecord>>;

    /// Replace all feature vectors.
    fn replace_feature_vectors(
        &self,
        run_id: Uuid,
        vectors: &[FeatureVector],
    ) -> PipelineResult<GenerationMeta>;

    /// Load all feature vectors.
    fn load_feature_vectors(&self) -> PipelineResult<Vec<FeatureVector>>;

    /// Replace all cluster assignments.
    fn replace_cluster_assignments(
        &self,
        run_id: Uuid,
        assignments: &[ClusterAssignment],
    ) -> PipelineResult<GenerationMeta>;

    /// Load all cluster assignments.
    fn load_cluster_assignments(&self) -> PipelineResult<Vec<ClusterAssignment>>;

    // ==================== Metadata ====================

    /// Current generation of a collection, `None` if never written.
    fn generation(&self, collection: Collection) -> PipelineResult<Option<GenerationMeta>>;

    /// Backend identification for logs.
    fn backend(&self) -> StorageBackend;
}
