//! Exit code behaviour of the binary.
//!
//! - 0: Success
//! - 1: Data absent, precondition, configuration
//! - 2: Store unreachable or corrupted

use std::fs;

use patient_journey_storage::RocksDbJourneyStore;
use tempfile::TempDir;

use super::helpers::{
    run_cli, write_config, write_export, EXIT_BLOCKING, EXIT_SUCCESS, EXIT_WARNING,
};

#[test]
fn test_exit_1_missing_patients_csv() {
    let data = TempDir::new().unwrap();
    let db = TempDir::new().unwrap();
    fs::write(data.path().join("encounters.csv"), "Id,START,PATIENT\n").unwrap();

    let out = run_cli(
        db.path(),
        &["ingest", "--data-dir", data.path().to_str().unwrap()],
    );

    assert_eq!(out.exit_code, EXIT_WARNING, "stderr: {}", out.stderr);
    assert!(out.stderr.contains("patients.csv"), "stderr: {}", out.stderr);
    assert!(out.stdout.is_empty());
    println!("[VERIFIED] missing patients.csv exits 1");
}

#[test]
fn test_exit_1_aggregate_on_empty_store() {
    let db = TempDir::new().unwrap();
    let out = run_cli(db.path(), &["aggregate"]);

    assert_eq!(out.exit_code, EXIT_WARNING, "stderr: {}", out.stderr);
    assert!(out.stderr.contains("run ingest first"), "stderr: {}", out.stderr);
}

#[test]
fn test_exit_1_k_exceeds_distinct_points() {
    let data = TempDir::new().unwrap();
    let db = TempDir::new().unwrap();
    write_export(data.path(), 6, false);
    // Two journey shapes only, so k = 3 cannot be satisfied.
    let config = write_config(data.path(), 3);
    let config = config.to_str().unwrap();

    let ingest = run_cli(
        db.path(),
        &["--config", config, "ingest", "--data-dir", data.path().to_str().unwrap()],
    );
    assert_eq!(ingest.exit_code, EXIT_SUCCESS, "stderr: {}", ingest.stderr);

    let out = run_cli(db.path(), &["--config", config, "run"]);
    assert_eq!(out.exit_code, EXIT_WARNING, "stderr: {}", out.stderr);
    assert!(out.stderr.contains("exceeds"), "stderr: {}", out.stderr);

    let summary = run_cli(db.path(), &["--config", config, "summary"]);
    assert_eq!(summary.exit_code, EXIT_WARNING, "no assignments were written");
    println!("[VERIFIED] precondition failure exits 1 and writes nothing");
}

#[test]
fn test_exit_1_invalid_config() {
    let data = TempDir::new().unwrap();
    let db = TempDir::new().unwrap();
    let config = write_config(data.path(), 1);

    let out = run_cli(db.path(), &["--config", config.to_str().unwrap(), "run"]);

    assert_eq!(out.exit_code, EXIT_WARNING, "stderr: {}", out.stderr);
    assert!(out.stderr.contains("Configuration error"), "stderr: {}", out.stderr);
}

#[test]
fn test_exit_2_store_locked() {
    let data = TempDir::new().unwrap();
    let db = TempDir::new().unwrap();
    let config = write_config(data.path(), 2);

    // Holding the RocksDB lock makes the store unreachable for the binary.
    let _held = RocksDbJourneyStore::open(db.path()).unwrap();

    let out = run_cli(db.path(), &["--config", config.to_str().unwrap(), "summary"]);

    assert_eq!(out.exit_code, EXIT_BLOCKING, "stderr: {}", out.stderr);
    assert!(out.stderr.contains("unreachable"), "stderr: {}", out.stderr);
    println!("[VERIFIED] locked store exits 2");
}
