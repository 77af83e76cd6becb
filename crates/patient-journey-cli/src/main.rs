//! Patient Journey CLI
//!
//! Drives the journey clustering pipeline against a RocksDB store.
//!
//! # Commands
//!
//! - `ingest --data-dir <dir>`: load Synthea-style CSV exports into the raw collections
//! - `aggregate`: group raw events into one composite record per patient
//! - `features`: derive journey feature vectors from composite records
//! - `cluster`: standardized K-means over the stored feature vectors
//! - `run`: aggregate, features and cluster in order
//! - `summary [--samples]`: per-cluster counts and mean features as JSON
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Recoverable failure (data absent, precondition, configuration, storage)
//! - 2: Store unreachable or persisted data corrupted

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;

use commands::stages::{stage_command, Stage};

/// Patient Journey - clinical event aggregation and journey clustering
#[derive(Parser)]
#[command(name = "patient-journey")]
#[command(version)]
#[command(about = "Aggregate clinical events, derive journey features and cluster patients")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the RocksDB store directory (overrides `[store] path`)
    #[arg(long, global = true, env = "PATIENT_JOURNEY_DB_PATH")]
    db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true, env = "PATIENT_JOURNEY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load CSV exports into the raw event collections
    Ingest(commands::ingest::IngestArgs),
    /// Build composite patient records from the raw collections
    Aggregate,
    /// Extract journey feature vectors from composite records
    Features,
    /// Cluster feature vectors and store the assignments
    Cluster,
    /// Run aggregate, features and cluster in order
    Run,
    /// Print the per-cluster summary of the stored assignments
    Summary(commands::summary::SummaryArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let globals = commands::GlobalArgs {
        db: cli.db,
        config: cli.config,
    };

    let exit_code = match cli.command {
        Commands::Ingest(args) => commands::ingest::ingest_command(&globals, args),
        Commands::Aggregate => stage_command(&globals, Stage::Aggregate),
        Commands::Features => stage_command(&globals, Stage::Features),
        Commands::Cluster => stage_command(&globals, Stage::Cluster),
        Commands::Run => stage_command(&globals, Stage::All),
        Commands::Summary(args) => commands::summary::summary_command(&globals, args),
    };

    std::process::exit(exit_code);
}
