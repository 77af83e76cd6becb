//! `summary` command: per-cluster profile of the stored assignments.

use clap::Args;
use patient_journey_core::clustering::{sample_per_cluster, summarize, ClusterSummary};
use patient_journey_core::traits::PipelineStore;
use patient_journey_core::{ClusterAssignment, Collection, PipelineError};
use serde::Serialize;
use tracing::debug;

use super::{finish, open_store, print_json, GlobalArgs};
use crate::error::CliResult;

/// Arguments for `summary`
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Include one sampled patient per cluster
    #[arg(long)]
    pub samples: bool,

    /// Sampling seed (defaults to `[clustering] seed`)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// JSON body printed by `summary`.
#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    #[serde(flatten)]
    pub summary: ClusterSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<ClusterAssignment>>,
}

/// Execute `summary`
pub fn summary_command(globals: &GlobalArgs, args: SummaryArgs) -> i32 {
    debug!("summary_command: args={:?}", args);
    finish("summary", run(globals, &args))
}

fn run(globals: &GlobalArgs, args: &SummaryArgs) -> CliResult<()> {
    let config = globals.load_config()?;
    let store = open_store(&config)?;
    let seed = args.seed.unwrap_or(config.clustering.seed);
    let output = build_summary(&store, args.samples.then_some(seed))?;
    print_json(&output)
}

/// Summarize stored assignments, sampling with `sample_seed` when given.
///
/// # Errors
///
/// - `PipelineError::DataAbsent` if no assignments are stored
pub fn build_summary<S: PipelineStore + ?Sized>(
    store: &S,
    sample_seed: Option<u64>,
) -> CliResult<SummaryOutput> {
    let assignments = store.load_cluster_assignments()?;
    if assignments.is_empty() {
        return Err(PipelineError::data_absent(
            Collection::ClusterAssignments,
            "no cluster assignments; run cluster first",
        )
        .into());
    }

    Ok(SummaryOutput {
        summary: summarize(&assignments),
        samples: sample_seed.map(|seed| sample_per_cluster(&assignments, seed)),
    })
}
