//! End-to-end runs of the binary over synthetic exports.

use tempfile::TempDir;

use super::helpers::{run_cli, write_config, write_export, EXIT_SUCCESS};

#[test]
fn test_ingest_run_summary() {
    let data = TempDir::new().unwrap();
    let db = TempDir::new().unwrap();
    write_export(data.path(), 10, true);
    let config = write_config(data.path(), 2);
    let config = config.to_str().unwrap();

    let ingest = run_cli(
        db.path(),
        &["--config", config, "ingest", "--data-dir", data.path().to_str().unwrap()],
    );
    assert_eq!(ingest.exit_code, EXIT_SUCCESS, "stderr: {}", ingest.stderr);
    let ingested = ingest.json();
    assert_eq!(ingested["patients"], 10);
    assert_eq!(ingested["encounters"], 5 + 5 * 4 + 1);
    assert_eq!(ingested["conditions"], 10);
    assert_eq!(ingested["medications"], 0);
    println!("[VERIFIED] ingest: {}", ingested);

    let run = run_cli(db.path(), &["--config", config, "run"]);
    assert_eq!(run.exit_code, EXIT_SUCCESS, "stderr: {}", run.stderr);
    let report = run.json();
    assert_eq!(report["aggregation"]["records"], 10);
    assert_eq!(report["aggregation"]["orphaned"]["counts"]["encounter"], 1);
    assert_eq!(report["extraction"]["extracted"], 10);
    assert_eq!(report["clustering"]["k"], 2);
    assert_eq!(report["clustering"]["points"], 10);
    let silhouette = report["clustering"]["silhouette"].as_f64().unwrap();
    assert!(silhouette > 0.9, "two identical-shape groups separate cleanly: {}", silhouette);
    println!("[VERIFIED] run: silhouette={}", silhouette);

    let summary = run_cli(db.path(), &["--config", config, "summary", "--samples"]);
    assert_eq!(summary.exit_code, EXIT_SUCCESS, "stderr: {}", summary.stderr);
    let summary = summary.json();
    assert_eq!(summary["total"], 10);
    let clusters = summary["clusters"].as_array().unwrap();
    assert_eq!(clusters.len(), 2);
    let mut visit_means: Vec<f64> = clusters
        .iter()
        .map(|c| c["mean_num_visits"].as_f64().unwrap())
        .collect();
    visit_means.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(visit_means, vec![1.0, 4.0]);
    assert_eq!(summary["samples"].as_array().unwrap().len(), 2);
    println!("[VERIFIED] summary: {}", summary);
}

#[test]
fn test_stages_one_by_one_and_rerun_replaces() {
    let data = TempDir::new().unwrap();
    let db = TempDir::new().unwrap();
    write_export(data.path(), 6, false);
    let config = write_config(data.path(), 2);
    let config = config.to_str().unwrap();
    let data_dir = data.path().to_str().unwrap();

    assert_eq!(
        run_cli(db.path(), &["--config", config, "ingest", "--data-dir", data_dir]).exit_code,
        EXIT_SUCCESS
    );
    for stage in ["aggregate", "features", "cluster"] {
        let out = run_cli(db.path(), &["--config", config, stage]);
        assert_eq!(out.exit_code, EXIT_SUCCESS, "{} failed: {}", stage, out.stderr);
        assert!(out.json()["run_id"].is_string());
    }

    // Shrink the export and run again; outputs are replaced, not appended.
    write_export(data.path(), 4, false);
    assert_eq!(
        run_cli(db.path(), &["--config", config, "ingest", "--data-dir", data_dir]).exit_code,
        EXIT_SUCCESS
    );
    let run = run_cli(db.path(), &["--config", config, "run"]);
    assert_eq!(run.exit_code, EXIT_SUCCESS, "stderr: {}", run.stderr);

    let summary = run_cli(db.path(), &["--config", config, "summary"]).json();
    assert_eq!(summary["total"], 4);
    assert!(summary.get("samples").is_none());
    println!("[VERIFIED] rerun over 4 patients leaves exactly 4 assignments");
}
