//! K-means clustering of journey feature vectors.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{ClusterAssignment, Collection, FeatureVector, JourneyFeature};

use super::algorithms::{count_distinct, run_lloyd, LloydRun};
use super::config::KMeansConfig;
use super::metrics::Point;
use super::scaler::StandardScaler;
use super::silhouette::silhouette_score;
use super::types::{ClusterCenter, ClusteringOutcome};

/// Trait for clustering journey feature vectors.
pub trait JourneyClusterer {
    /// Partition feature vectors into `config.k` clusters.
    ///
    /// # Errors
    ///
    /// - `PipelineError::DataAbsent` if `vectors` is empty
    /// - `PipelineError::Config` if `config` fails validation
    /// - `PipelineError::Precondition` if a value is non-finite, a feature has
    ///   zero variance, or `k` exceeds the number of distinct points
    fn cluster(
        &self,
        vectors: &[FeatureVector],
        config: &KMeansConfig,
    ) -> PipelineResult<ClusteringOutcome>;
}

/// Standardized k-means++ with restarts.
#[derive(Clone, Debug, Default)]
pub struct StandardKMeans;

impl StandardKMeans {
    pub fn new() -> Self {
        Self
    }
}

impl JourneyClusterer for StandardKMeans {
    fn cluster(
        &self,
        vectors: &[FeatureVector],
        config: &KMeansConfig,
    ) -> PipelineResult<ClusteringOutcome> {
        config.validate().map_err(PipelineError::config)?;
        if vectors.is_empty() {
            return Err(PipelineError::data_absent(
                Collection::FeatureVectors,
                "no feature vectors to cluster",
            ));
        }

        let raw: Vec<Point> = vectors.iter().map(FeatureVector::feature_row).collect();
        check_finite(vectors, &raw)?;

        let distinct = count_distinct(&raw);
        if config.k > distinct {
            return Err(PipelineError::precondition(format!(
                "k ({}) exceeds the number of distinct feature vectors ({})",
                config.k, distinct
            )));
        }

        let scaler = StandardScaler::fit(&raw)?;
        let points: Vec<Point> = raw.iter().map(|row| scaler.transform(row)).collect();

        info!(
            k = config.k,
            n = points.len(),
            n_init = config.n_init,
            seed = config.seed,
            "starting k-means"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut best: Option<(usize, LloydRun)> = None;

        for restart in 0..config.n_init {
            let run = run_lloyd(
                &points,
                config.k,
                config.max_iterations,
                config.tolerance,
                &mut rng,
            );
            debug!(
                restart,
                inertia = run.inertia,
                iterations = run.iterations,
                converged = run.converged,
                "k-means restart finished"
            );
            let better = match &best {
                Some((_, current)) => run.inertia < current.inertia,
                None => true,
            };
            if better {
                best = Some((restart, run));
            }
        }

        let Some((best_restart, run)) = best else {
            return Err(PipelineError::config("n_init must be > 0"));
        };

        if !run.converged {
            warn!(
                iterations = run.iterations,
                "k-means did not converge within max_iterations"
            );
        }

        let silhouette = silhouette_score(&points, &run.labels, config.k);

        let mut sizes = vec![0usize; config.k];
        for &label in &run.labels {
            sizes[label] += 1;
        }
        let centers = run
            .centroids
            .iter()
            .enumerate()
            .map(|(cluster, centroid)| ClusterCenter {
                cluster,
                values: scaler.inverse_transform(centroid),
                size: sizes[cluster],
            })
            .collect();

        let assignments = vectors
            .iter()
            .zip(&run.labels)
            .map(|(features, &cluster)| ClusterAssignment {
                features: features.clone(),
                cluster,
            })
            .collect();

        info!(
            silhouette,
            inertia = run.inertia,
            iterations = run.iterations,
            best_restart,
            "k-means complete"
        );

        Ok(ClusteringOutcome {
            assignments,
            centers,
            silhouette,
            inertia: run.inertia,
            iterations: run.iterations,
            converged: run.converged,
            best_restart,
            scaler,
        })
    }
}

fn check_finite(vectors: &[FeatureVector], rows: &[Point]) -> PipelineResult<()> {
    for (vector, row) in vectors.iter().zip(rows) {
        for feature in JourneyFeature::ALL {
            let value = row[feature.index()];
            if !value.is_finite() {
                return Err(PipelineError::precondition(format!(
                    "patient {} has non-finite {} ({})",
                    vector.patient_id, feature, value
                )));
            }
        }
    }
    Ok(())
}
