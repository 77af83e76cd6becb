//! Shared helpers: synthetic CSV exports and binary invocation.

use std::fs;
use std::path::Path;
use std::process::Command;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_WARNING: i32 = 1;
pub const EXIT_BLOCKING: i32 = 2;

/// Captured result of one binary invocation.
pub struct CliOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliOutput {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| {
            panic!("stdout is not JSON ({}):\n{}\nstderr:\n{}", e, self.stdout, self.stderr)
        })
    }
}

/// Run `patient-journey --db <db> <args...>` with a clean environment.
pub fn run_cli(db: &Path, args: &[&str]) -> CliOutput {
    let mut command = Command::new(env!("CARGO_BIN_EXE_patient-journey"));
    command.arg("--db").arg(db).args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with("PATIENT_JOURNEY_") {
            command.env_remove(key);
        }
    }
    command.env("RUST_LOG", "warn");

    let output = command.output().expect("failed to spawn patient-journey");
    CliOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Write a Synthea-style export with two journey shapes.
///
/// Even patients: one encounter. Odd patients: four encounters a quarter
/// apart. `orphan` adds an encounter for a patient with no demographics.
pub fn write_export(dir: &Path, patients: usize, orphan: bool) {
    let mut demographics = String::from("Id,BIRTHDATE,GENDER\n");
    let mut encounters = String::from("Id,START,STOP,PATIENT,ENCOUNTERCLASS\n");
    let mut conditions = String::from("START,STOP,PATIENT,ENCOUNTER,CODE,DESCRIPTION\n");

    for p in 0..patients {
        let patient = format!("patient-{:03}", p);
        demographics.push_str(&format!("{},1970-01-01,F\n", patient));

        let visits = if p % 2 == 0 { 1 } else { 4 };
        for v in 0..visits {
            let month = 1 + v * 3;
            encounters.push_str(&format!(
                "enc-{}-{},2021-{:02}-01T08:00:00Z,2021-{:02}-01T09:30:00Z,{},ambulatory\n",
                p, v, month, month, patient
            ));
        }
        conditions.push_str(&format!(
            "2021-01-01,,{},enc-{}-0,44054006,Diabetes\n",
            patient, p
        ));
    }
    if orphan {
        encounters.push_str(
            "enc-orphan,2021-03-01T08:00:00Z,2021-03-01T09:00:00Z,ghost-patient,wellness\n",
        );
    }

    fs::write(dir.join("patients.csv"), demographics).unwrap();
    fs::write(dir.join("encounters.csv"), encounters).unwrap();
    fs::write(dir.join("conditions.csv"), conditions).unwrap();
}

/// Write a config file clustering into `k` groups with a single open attempt.
pub fn write_config(dir: &Path, k: usize) -> std::path::PathBuf {
    let path = dir.join("pipeline.toml");
    fs::write(
        &path,
        format!(
            "[clustering]\nk = {}\n\n[retry]\nmax_attempts = 1\n",
            k
        ),
    )
    .unwrap();
    path
}
