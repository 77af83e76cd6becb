//! PipelineStore trait implementation for RocksDbJourneyStore.

use uuid::Uuid;

use patient_journey_core::traits::{PipelineStore, StorageBackend};
use patient_journey_core::{
    ClusterAssignment, Collection, CompositePatientRecord, EventKind, FeatureVector,
    GenerationMeta, PipelineResult, RawEvent,
};

use super::RocksDbJourneyStore;

impl PipelineStore for RocksDbJourneyStore {
    fn replace_demographics(
        &self,
        run_id: Uuid,
        records: &[RawEvent],
    ) -> PipelineResult<GenerationMeta> {
        Ok(self.replace_collection(Collection::Patients, run_id, records)?)
    }

    fn load_demographics(&self) -> PipelineResult<Vec<RawEvent>> {
        Ok(self.load_collection(Collection::Patients)?)
    }

    fn replace_events(
        &self,
        kind: EventKind,
        run_id: Uuid,
        events: &[RawEvent],
    ) -> PipelineResult<GenerationMeta> {
        Ok(self.replace_collection(Collection::for_events(kind), run_id, events)?)
    }

    fn load_events(&self, kind: EventKind) -> PipelineResult<Vec<RawEvent>> {
        Ok(self.load_collection(Collection::for_events(kind))?)
    }

    fn replace_composite_records(
        &self,
        run_id: Uuid,
        records: &[CompositePatientRecord],
    ) -> PipelineResult<GenerationMeta> {
        Ok(self.replace_collection(Collection::CompositeRecords, run_id, records)?)
    }

    fn load_composite_records(&self) -> PipelineResult<Vec<CompositePatientRecord>> {
        Ok(self.load_collection(Collection::CompositeRecords)?)
    }

    fn replace_feature_vectors(
        &self,
        run_id: Uuid,
        vectors: &[FeatureVector],
    ) -> PipelineResult<GenerationMeta> {
        Ok(self.replace_collection(Collection::FeatureVectors, run_id, vectors)?)
    }

    fn load_feature_vectors(&self) -> PipelineResult<Vec<FeatureVector>> {
        Ok(self.load_collection(Collection::FeatureVectors)?)
    }

    fn replace_cluster_assignments(
        &self,
        run_id: Uuid,
        assignments: &[ClusterAssignment],
    ) -> PipelineResult<GenerationMeta> {
        Ok(self.replace_collection(Collection::ClusterAssignments, run_id, assignments)?)
    }

    fn load_cluster_assignments(&self) -> PipelineResult<Vec<ClusterAssignment>> {
        Ok(self.load_collection(Collection::ClusterAssignments)?)
    }

    fn generation(&self, collection: Collection) -> PipelineResult<Option<GenerationMeta>> {
        Ok(self.read_generation(collection)?)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::RocksDb
    }
}
