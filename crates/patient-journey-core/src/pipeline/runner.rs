//! The pipeline runner.

use tracing::info;
use uuid::Uuid;

use crate::aggregation::{aggregate_events, AggregationStats, EventBatch};
use crate::clustering::{ClusteringReport, JourneyClusterer, StandardKMeans};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::features::{extract_all, ExtractionStats};
use crate::traits::PipelineStore;
use crate::types::{Collection, EventKind};

use super::report::RunReport;

/// Runs pipeline stages against an explicitly supplied store.
///
/// Every stage write is tagged with the same `run_id`.
pub struct Pipeline<'a, S: PipelineStore + ?Sized, C: JourneyClusterer = StandardKMeans> {
    store: &'a S,
    config: PipelineConfig,
    clusterer: C,
    run_id: Uuid,
}

impl<'a, S: PipelineStore + ?Sized> Pipeline<'a, S, StandardKMeans> {
    /// Create a runner using [`StandardKMeans`].
    ///
    /// # Errors
    ///
    /// - `PipelineError::Config` if `config` fails validation
    pub fn new(store: &'a S, config: PipelineConfig) -> PipelineResult<Self> {
        Self::with_clusterer(store, config, StandardKMeans::new())
    }
}

impl<'a, S: PipelineStore + ?Sized, C: JourneyClusterer> Pipeline<'a, S, C> {
    /// Create a runner with a custom clusterer.
    pub fn with_clusterer(
        store: &'a S,
        config: PipelineConfig,
        clusterer: C,
    ) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            clusterer,
            run_id: Uuid::new_v4(),
        })
    }

    /// Identifier stamped on every generation this runner writes.
    #[inline]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Group raw events into composite records and replace the stored set.
    ///
    /// # Errors
    ///
    /// - `PipelineError::DataAbsent` if no demographics are stored
    pub fn aggregate(&self) -> PipelineResult<AggregationStats> {
        info!(run_id = %self.run_id, backend = %self.store.backend(), "aggregation stage started");

        let demographics = self.store.load_demographics()?;
        if demographics.is_empty() {
            return Err(PipelineError::data_absent(
                Collection::Patients,
                "no demographic records; run ingest first",
            ));
        }

        let mut batch = EventBatch::new();
        for kind in EventKind::ALL {
            batch.insert(kind, self.store.load_events(kind)?);
        }

        let outcome = aggregate_events(demographics, batch);
        let meta = self
            .store
            .replace_composite_records(self.run_id, &outcome.records)?;

        info!(
            generation = meta.generation,
            records = meta.record_count,
            "composite records replaced"
        );
        Ok(outcome.stats)
    }

    /// Derive feature vectors from stored composite records.
    ///
    /// # Errors
    ///
    /// - `PipelineError::DataAbsent` if there are no composite records, or if
    ///   none of them yields a vector (nothing is written in that case)
    pub fn extract_features(&self) -> PipelineResult<ExtractionStats> {
        info!(run_id = %self.run_id, "feature stage started");

        let records = self.store.load_composite_records()?;
        if records.is_empty() {
            return Err(PipelineError::data_absent(
                Collection::CompositeRecords,
                "no composite records; run aggregate first",
            ));
        }

        let report = extract_all(&records, &self.config.features);
        if report.vectors.is_empty() {
            return Err(PipelineError::data_absent(
                Collection::FeatureVectors,
                format!(
                    "none of {} records has a parseable encounter start",
                    report.stats.processed
                ),
            ));
        }

        let meta = self
            .store
            .replace_feature_vectors(self.run_id, &report.vectors)?;
        info!(
            generation = meta.generation,
            vectors = meta.record_count,
            "feature vectors replaced"
        );
        Ok(report.stats)
    }

    /// Cluster stored feature vectors and replace the stored assignments.
    ///
    /// # Errors
    ///
    /// - `PipelineError::DataAbsent` if no feature vectors are stored
    /// - `PipelineError::Precondition` from the clusterer
    pub fn cluster(&self) -> PipelineResult<ClusteringReport> {
        info!(run_id = %self.run_id, "clustering stage started");

        let vectors = self.store.load_feature_vectors()?;
        let outcome = self.clusterer.cluster(&vectors, &self.config.clustering)?;

        let meta = self
            .store
            .replace_cluster_assignments(self.run_id, &outcome.assignments)?;
        info!(
            generation = meta.generation,
            assignments = meta.record_count,
            silhouette = outcome.silhouette,
            "cluster assignments replaced"
        );
        Ok(outcome.report())
    }

    /// Aggregate, extract and cluster in order, stopping at the first error.
    pub fn run_all(&self) -> PipelineResult<RunReport> {
        let aggregation = self.aggregate()?;
        let extraction = self.extract_features()?;
        let clustering = self.cluster()?;

        Ok(RunReport {
            run_id: self.run_id,
            aggregation,
            extraction,
            clustering,
        })
    }
}
