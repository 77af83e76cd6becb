//! Tests for pipeline error types.

use super::*;
use crate::types::{Collection, PatientId};

#[test]
fn test_data_absent_message_names_collection() {
    let err = PipelineError::data_absent(Collection::CompositeRecords, "run aggregate first");
    let msg = err.to_string();

    assert!(msg.contains("composite_records"));
    assert!(msg.contains("run aggregate first"));
    assert_eq!(err.category(), "data_absent");
    assert!(!err.is_retryable());
}

#[test]
fn test_only_connectivity_is_retryable() {
    let errors = [
        PipelineError::connectivity("/tmp/db", "lock held"),
        PipelineError::precondition("k > points"),
        PipelineError::config("k must be >= 2"),
        PipelineError::Storage("write failed".into()),
        PipelineError::Corrupted("bad version".into()),
    ];

    let retryable: Vec<bool> = errors.iter().map(PipelineError::is_retryable).collect();
    assert_eq!(retryable, vec![true, false, false, false, false]);

    println!("[VERIFIED] Only connectivity errors are retryable");
}

#[test]
fn test_connectivity_message() {
    let err = PipelineError::connectivity("/var/lib/journeys", "permission denied");
    assert_eq!(
        err.to_string(),
        "Store unreachable at '/var/lib/journeys': permission denied"
    );
}

#[test]
fn test_malformed_record_display() {
    let record = MalformedRecord::new(
        PatientId::parse("p-9").unwrap(),
        MalformedKind::NegativeJourneySpan,
        "end 2020-01-01 before start 2020-02-01",
    );
    let msg = record.to_string();
    assert!(msg.starts_with("patient p-9: negative_journey_span"));
}
