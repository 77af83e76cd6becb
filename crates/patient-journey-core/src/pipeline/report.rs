//! Run-level reporting.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregation::AggregationStats;
use crate::clustering::ClusteringReport;
use crate::error::{PipelineError, PipelineResult};
use crate::features::ExtractionStats;

/// Everything one full pipeline run did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub aggregation: AggregationStats,
    pub extraction: ExtractionStats,
    pub clustering: ClusteringReport,
}

impl RunReport {
    /// Pretty-printed JSON for CLI output.
    pub fn to_json_pretty(&self) -> PipelineResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::Storage(format!("failed to render run report: {}", e)))
    }
}
