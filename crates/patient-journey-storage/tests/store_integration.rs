//! Integration tests: the pipeline over a real RocksDB store.

use tempfile::TempDir;
use uuid::Uuid;

use patient_journey_core::config::{PipelineConfig, RetryPolicy, StoreSettings};
use patient_journey_core::pipeline::Pipeline;
use patient_journey_core::traits::{PipelineStore, StorageBackend};
use patient_journey_core::types::{DEMOGRAPHIC_ID_FIELD, PATIENT_FIELD, START_FIELD, STOP_FIELD};
use patient_journey_core::{Collection, EventKind, PipelineError, RawEvent};
use patient_journey_storage::{open_with_retry, RocksDbJourneyStore};

fn ingest(store: &RocksDbJourneyStore) {
    let run = Uuid::new_v4();
    let mut demographics = Vec::new();
    let mut encounters = Vec::new();

    for i in 0..10u32 {
        let id = format!("patient-{i:02}");
        demographics.push(
            RawEvent::new()
                .with(DEMOGRAPHIC_ID_FIELD, id.as_str())
                .with("GENDER", if i % 2 == 0 { "F" } else { "M" }),
        );
        let visits = if i < 5 { 1 + i % 2 } else { 8 + i % 3 };
        for v in 0..visits {
            let month = 1 + v;
            encounters.push(
                RawEvent::new()
                    .with(PATIENT_FIELD, id.as_str())
                    .with(START_FIELD, format!("2022-{:02}-{:02}", month, 1 + i))
                    .with(STOP_FIELD, format!("2022-{:02}-{:02}", month, 2 + i)),
            );
        }
    }

    store.replace_demographics(run, &demographics).unwrap();
    store
        .replace_events(EventKind::Encounter, run, &encounters)
        .unwrap();
}

fn config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.clustering.k = 2;
    config
}

#[test]
fn test_full_pipeline_persists_across_reopen() {
    let tmp = TempDir::new().unwrap();

    let (run_id, assignments) = {
        let store = RocksDbJourneyStore::open(tmp.path()).unwrap();
        assert_eq!(store.backend(), StorageBackend::RocksDb);
        ingest(&store);

        let pipeline = Pipeline::new(&store, config()).unwrap();
        let report = pipeline.run_all().unwrap();
        assert_eq!(report.aggregation.records, 10);
        assert_eq!(report.extraction.extracted, 10);

        store.flush_all().unwrap();
        (pipeline.run_id(), store.load_cluster_assignments().unwrap())
    };

    let reopened = RocksDbJourneyStore::open(tmp.path()).unwrap();
    assert_eq!(reopened.load_cluster_assignments().unwrap(), assignments);
    assert_eq!(reopened.load_feature_vectors().unwrap().len(), 10);

    let meta = reopened
        .generation(Collection::ClusterAssignments)
        .unwrap()
        .unwrap();
    assert_eq!(meta.run_id, run_id);
    assert_eq!(meta.record_count, 10);

    let records = reopened.load_composite_records().unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(records[0].demographics.get("GENDER"), Some("F"));

    println!("[VERIFIED] Pipeline output survives reopen");
}

#[test]
fn test_rerun_swaps_generations() {
    let tmp = TempDir::new().unwrap();
    let store = RocksDbJourneyStore::open(tmp.path()).unwrap();
    ingest(&store);

    Pipeline::new(&store, config()).unwrap().run_all().unwrap();
    Pipeline::new(&store, config()).unwrap().run_all().unwrap();

    for collection in [
        Collection::CompositeRecords,
        Collection::FeatureVectors,
        Collection::ClusterAssignments,
    ] {
        let meta = store.generation(collection).unwrap().unwrap();
        assert_eq!(meta.generation, 2);
        assert_eq!(store.raw_row_count(collection).unwrap(), meta.record_count);
    }
}

#[test]
fn test_failed_stage_keeps_previous_output() {
    let tmp = TempDir::new().unwrap();
    let store = RocksDbJourneyStore::open(tmp.path()).unwrap();
    ingest(&store);
    Pipeline::new(&store, config()).unwrap().run_all().unwrap();
    let before = store.load_cluster_assignments().unwrap();

    let mut greedy = config();
    greedy.clustering.k = 40;
    let err = Pipeline::new(&store, greedy).unwrap().cluster().unwrap_err();

    assert!(matches!(err, PipelineError::Precondition(_)));
    assert_eq!(store.load_cluster_assignments().unwrap(), before);
}

#[test]
fn test_locked_store_is_connectivity_error() {
    let tmp = TempDir::new().unwrap();
    let _holder = RocksDbJourneyStore::open(tmp.path()).unwrap();

    let settings = StoreSettings {
        path: tmp.path().to_path_buf(),
        ..StoreSettings::default()
    };
    let policy = RetryPolicy {
        max_attempts: 2,
        initial_backoff_ms: 1,
        max_backoff_ms: 1,
    };

    let err = open_with_retry(&settings, &policy).err().unwrap();

    assert!(matches!(err, PipelineError::Connectivity { .. }));
    println!("[VERIFIED] Locked store surfaces as connectivity: {}", err);
}

#[test]
fn test_open_with_retry_succeeds_on_free_path() {
    let tmp = TempDir::new().unwrap();
    let settings = StoreSettings {
        path: tmp.path().join("db"),
        block_cache_mb: 8,
    };

    let store = open_with_retry(&settings, &RetryPolicy::no_retry()).unwrap();
    store.health_check().unwrap();
    assert!(store.load_demographics().unwrap().is_empty());
}
