//! Per-patient feature derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{FeatureConfig, JourneyEndPolicy, NegativeSpanPolicy};
use crate::error::{MalformedKind, MalformedRecord};
use crate::types::{CompositePatientRecord, FeatureVector, START_FIELD, STOP_FIELD};

use super::report::{ExtractionReport, ExtractionStats};
use super::timestamp::parse_timestamp;

const SECONDS_PER_DAY: i64 = 86_400;

/// Why a record produced no feature vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoEncounters,
    NoParseableStart,
}

/// Result of extracting one record.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureExtraction {
    Extracted(FeatureVector),
    Skipped(SkipReason),
    /// Excluded under [`NegativeSpanPolicy::Reject`].
    Rejected(MalformedRecord),
}

impl FeatureExtraction {
    /// The vector, if one was produced.
    pub fn vector(&self) -> Option<&FeatureVector> {
        match self {
            Self::Extracted(v) => Some(v),
            _ => None,
        }
    }
}

/// Derive journey features from one composite record.
pub fn extract_features(
    record: &CompositePatientRecord,
    config: &FeatureConfig,
) -> FeatureExtraction {
    extract_with_warnings(record, config, &mut Vec::new())
}

/// Extract features for every record, collecting counts and warnings.
///
/// Output order follows input order.
pub fn extract_all(records: &[CompositePatientRecord], config: &FeatureConfig) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for record in records {
        report.stats.processed += 1;
        let warnings_before = report.warnings.len();
        let outcome = extract_with_warnings(record, config, &mut report.warnings);
        tally_value_warnings(&mut report.stats, &report.warnings[warnings_before..]);

        match outcome {
            FeatureExtraction::Extracted(vector) => {
                report.stats.extracted += 1;
                report.vectors.push(vector);
            }
            FeatureExtraction::Skipped(SkipReason::NoEncounters) => {
                report.stats.skipped_no_encounters += 1;
            }
            FeatureExtraction::Skipped(SkipReason::NoParseableStart) => {
                debug!(patient = %record.patient_id, "no parseable encounter start; skipped");
                report.stats.skipped_no_parseable_start += 1;
            }
            FeatureExtraction::Rejected(malformed) => {
                warn!(%malformed, "record rejected");
                report.stats.rejected += 1;
                report.warnings.push(malformed);
            }
        }
    }

    let ExtractionStats {
        processed,
        extracted,
        rejected,
        unparseable_starts,
        unparseable_stops,
        ..
    } = report.stats;
    if unparseable_starts + unparseable_stops > 0 {
        warn!(
            unparseable_starts,
            unparseable_stops, "unparseable encounter timestamps dropped"
        );
    }
    info!(
        processed,
        extracted,
        skipped = report.stats.skipped(),
        rejected,
        "feature extraction complete"
    );

    report
}

fn tally_value_warnings(stats: &mut ExtractionStats, warnings: &[MalformedRecord]) {
    for w in warnings {
        match w.kind {
            MalformedKind::UnparseableStart => stats.unparseable_starts += 1,
            MalformedKind::UnparseableStop => stats.unparseable_stops += 1,
            MalformedKind::NegativeJourneySpan => {}
        }
    }
}

fn extract_with_warnings(
    record: &CompositePatientRecord,
    config: &FeatureConfig,
    warnings: &mut Vec<MalformedRecord>,
) -> FeatureExtraction {
    if record.encounters.is_empty() {
        return FeatureExtraction::Skipped(SkipReason::NoEncounters);
    }

    let mut starts: Vec<DateTime<Utc>> = Vec::with_capacity(record.encounters.len());
    let mut stops: Vec<DateTime<Utc>> = Vec::with_capacity(record.encounters.len());

    for encounter in &record.encounters {
        if let Some(raw) = encounter.get(START_FIELD) {
            match parse_timestamp(raw) {
                Some(ts) => starts.push(ts),
                None => warnings.push(MalformedRecord::new(
                    record.patient_id.clone(),
                    MalformedKind::UnparseableStart,
                    raw,
                )),
            }
        }
        if let Some(raw) = encounter.get(STOP_FIELD) {
            match parse_timestamp(raw) {
                Some(ts) => stops.push(ts),
                None => warnings.push(MalformedRecord::new(
                    record.patient_id.clone(),
                    MalformedKind::UnparseableStop,
                    raw,
                )),
            }
        }
    }

    let Some(&journey_start) = starts.iter().min() else {
        return FeatureExtraction::Skipped(SkipReason::NoParseableStart);
    };

    let latest_stop = stops.iter().max().copied();
    let mut journey_end = match config.journey_end {
        JourneyEndPolicy::LatestStop => latest_stop.unwrap_or(journey_start),
        JourneyEndPolicy::LatestEvent => starts
            .iter()
            .chain(stops.iter())
            .max()
            .copied()
            .unwrap_or(journey_start),
    };

    let mut journey_duration_days = whole_days(journey_start, journey_end);
    if journey_duration_days < 0 {
        match config.negative_span {
            NegativeSpanPolicy::Reject => {
                return FeatureExtraction::Rejected(MalformedRecord::new(
                    record.patient_id.clone(),
                    MalformedKind::NegativeJourneySpan,
                    format!("start {} is after end {}", journey_start, journey_end),
                ));
            }
            NegativeSpanPolicy::Clamp => {
                debug!(patient = %record.patient_id, "negative journey span clamped to zero");
                journey_end = journey_start;
                journey_duration_days = 0;
            }
        }
    }

    let num_visits = u32::try_from(starts.len()).unwrap_or(u32::MAX);
    let avg_gap_days = if num_visits > 1 {
        journey_duration_days as f64 / f64::from(num_visits)
    } else {
        0.0
    };

    FeatureExtraction::Extracted(FeatureVector {
        patient_id: record.patient_id.clone(),
        num_visits,
        journey_start,
        journey_end,
        journey_duration_days,
        avg_gap_days,
    })
}

/// Whole days from `start` to `end`, rounded towards negative infinity.
fn whole_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds().div_euclid(SECONDS_PER_DAY)
}
