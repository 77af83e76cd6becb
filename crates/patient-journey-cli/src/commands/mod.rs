//! CLI command handlers
//!
//! # Modules
//!
//! - `ingest`: CSV exports to raw event collections
//! - `stages`: aggregate, features, cluster and the full run
//! - `summary`: per-cluster report over stored assignments
//!
//! Every handler returns a process exit code. Results go to stdout as JSON,
//! diagnostics go to stderr through `tracing`.

pub mod ingest;
pub mod stages;
pub mod summary;

use std::path::PathBuf;

use patient_journey_core::PipelineConfig;
use patient_journey_storage::{open_with_retry, RocksDbJourneyStore};
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{CliError, CliExitCode, CliResult};

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Resolve the effective configuration.
    ///
    /// Precedence, lowest first: defaults, `--config` file, environment
    /// overrides, `--db`.
    pub fn load_config(&self) -> CliResult<PipelineConfig> {
        let config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        let mut config = config.with_env_overrides();
        if let Some(db) = &self.db {
            config.store.path = db.clone();
        }
        config.validate()?;
        debug!(?config, "configuration resolved");
        Ok(config)
    }
}

/// Open the store named by `config`, retrying while it is unreachable.
pub fn open_store(config: &PipelineConfig) -> CliResult<RocksDbJourneyStore> {
    Ok(open_with_retry(&config.store, &config.retry)?)
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{}", rendered);
    Ok(())
}

/// Turn a handler result into an exit code, reporting failures on stderr.
pub fn finish(command: &str, result: CliResult<()>) -> i32 {
    match result {
        Ok(()) => CliExitCode::Success.into(),
        Err(e) => {
            let code = CliExitCode::from(&e);
            let exit_code = code as u8;
            error!(command, exit_code, error = %e, "command failed");
            eprintln!("{}: {}", command, e);
            code.into()
        }
    }
}
