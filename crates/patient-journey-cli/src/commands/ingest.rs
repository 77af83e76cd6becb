//! `ingest` command: Synthea-style CSV exports to raw collections.
//!
//! Expects `patients.csv` in the data directory. The event exports
//! (`encounters.csv`, `conditions.csv`, `medications.csv`, `procedures.csv`,
//! `observations.csv`) are optional; a missing file replaces its collection
//! with an empty one. Every column of every row is kept as an event field.

use std::path::{Path, PathBuf};

use clap::Args;
use patient_journey_core::traits::PipelineStore;
use patient_journey_core::{Collection, EventKind, PipelineError, RawEvent};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{finish, open_store, print_json, GlobalArgs};
use crate::error::{CliError, CliResult};

/// Demographics export, the only required file.
pub const PATIENTS_FILE: &str = "patients.csv";

/// Arguments for `ingest`
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Directory containing the CSV exports
    #[arg(long)]
    pub data_dir: PathBuf,
}

/// Parsed contents of a data directory.
#[derive(Debug, Default)]
pub struct RawExport {
    pub demographics: Vec<RawEvent>,
    pub events: Vec<(EventKind, Vec<RawEvent>)>,
}

/// Row counts written by one ingest.
#[derive(Debug, Serialize)]
pub struct IngestSummary {
    pub run_id: Uuid,
    pub patients: usize,
    pub encounters: usize,
    pub conditions: usize,
    pub medications: usize,
    pub procedures: usize,
    pub observations: usize,
}

/// File name of the export for `kind` (`encounters.csv`, ...).
pub fn event_file_name(kind: EventKind) -> String {
    format!("{}.csv", kind.as_str())
}

/// Execute `ingest`
pub fn ingest_command(globals: &GlobalArgs, args: IngestArgs) -> i32 {
    debug!("ingest_command: args={:?}", args);
    finish("ingest", run(globals, &args))
}

fn run(globals: &GlobalArgs, args: &IngestArgs) -> CliResult<()> {
    let config = globals.load_config()?;
    let export = load_export(&args.data_dir)?;
    let store = open_store(&config)?;
    let summary = write_export(&store, &export)?;
    print_json(&summary)
}

/// Read every export in `dir`.
///
/// # Errors
///
/// - `PipelineError::Config` if `dir` is not a directory
/// - `PipelineError::DataAbsent` if `patients.csv` is missing
/// - `CliError::Csv` for unreadable or ragged files
pub fn load_export(dir: &Path) -> CliResult<RawExport> {
    if !dir.is_dir() {
        return Err(PipelineError::config(format!(
            "data directory '{}' does not exist",
            dir.display()
        ))
        .into());
    }

    let patients_path = dir.join(PATIENTS_FILE);
    if !patients_path.is_file() {
        return Err(PipelineError::data_absent(
            Collection::Patients,
            format!("{} not found in '{}'", PATIENTS_FILE, dir.display()),
        )
        .into());
    }
    let demographics = read_events(&patients_path)?;

    let mut events = Vec::with_capacity(EventKind::ALL.len());
    for kind in EventKind::ALL {
        let path = dir.join(event_file_name(kind));
        let rows = if path.is_file() {
            read_events(&path)?
        } else {
            warn!(file = %path.display(), "export missing, collection will be empty");
            Vec::new()
        };
        events.push((kind, rows));
    }

    Ok(RawExport {
        demographics,
        events,
    })
}

/// Read one CSV export, mapping each row to a [`RawEvent`] keyed by header.
pub fn read_events(path: &Path) -> CliResult<Vec<RawEvent>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CliError::csv(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| CliError::csv(path, e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CliError::csv(path, e))?;
        rows.push(RawEvent::from_fields(headers.iter().zip(record.iter())));
    }

    debug!(file = %path.display(), rows = rows.len(), "export read");
    Ok(rows)
}

/// Replace the raw collections with `export`, all under one run id.
pub fn write_export<S: PipelineStore + ?Sized>(
    store: &S,
    export: &RawExport,
) -> CliResult<IngestSummary> {
    let run_id = Uuid::new_v4();

    let mut summary = IngestSummary {
        run_id,
        patients: export.demographics.len(),
        encounters: 0,
        conditions: 0,
        medications: 0,
        procedures: 0,
        observations: 0,
    };

    for (kind, rows) in &export.events {
        store.replace_events(*kind, run_id, rows)?;
        let slot = match kind {
            EventKind::Encounter => &mut summary.encounters,
            EventKind::Condition => &mut summary.conditions,
            EventKind::Medication => &mut summary.medications,
            EventKind::Procedure => &mut summary.procedures,
            EventKind::Observation => &mut summary.observations,
        };
        *slot = rows.len();
    }
    store.replace_demographics(run_id, &export.demographics)?;

    info!(
        %run_id,
        patients = summary.patients,
        encounters = summary.encounters,
        "raw collections replaced"
    );
    Ok(summary)
}
