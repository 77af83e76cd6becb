//! Per-patient records produced by the pipeline stages.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::events::{EventKind, RawEvent};
use super::ids::PatientId;

/// Number of numeric features used for clustering.
pub const FEATURE_DIM: usize = 3;

/// One composite document per patient.
///
/// Invariant: every event in every list carries `patient_id` in its
/// `PATIENT` field. Only the aggregator constructs populated records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositePatientRecord {
    /// Patient identifier (demographic `Id`).
    pub patient_id: PatientId,
    /// Demographic payload as ingested.
    pub demographics: RawEvent,
    pub encounters: Vec<RawEvent>,
    pub conditions: Vec<RawEvent>,
    pub medications: Vec<RawEvent>,
    pub procedures: Vec<RawEvent>,
    pub observations: Vec<RawEvent>,
}

impl CompositePatientRecord {
    /// Create a record with no events.
    pub fn new(patient_id: PatientId, demographics: RawEvent) -> Self {
        Self {
            patient_id,
            demographics,
            encounters: Vec::new(),
            conditions: Vec::new(),
            medications: Vec::new(),
            procedures: Vec::new(),
            observations: Vec::new(),
        }
    }

    /// Events of the given kind.
    pub fn events(&self, kind: EventKind) -> &[RawEvent] {
        match kind {
            EventKind::Encounter => &self.encounters,
            EventKind::Condition => &self.conditions,
            EventKind::Medication => &self.medications,
            EventKind::Procedure => &self.procedures,
            EventKind::Observation => &self.observations,
        }
    }

    pub(crate) fn events_mut(&mut self, kind: EventKind) -> &mut Vec<RawEvent> {
        match kind {
            EventKind::Encounter => &mut self.encounters,
            EventKind::Condition => &mut self.conditions,
            EventKind::Medication => &mut self.medications,
            EventKind::Procedure => &mut self.procedures,
            EventKind::Observation => &mut self.observations,
        }
    }

    /// Total number of events across all kinds.
    pub fn total_events(&self) -> usize {
        EventKind::ALL.iter().map(|k| self.events(*k).len()).sum()
    }
}

/// Numeric feature used by the cluster engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyFeature {
    NumVisits,
    JourneyDurationDays,
    AvgGapDays,
}

impl JourneyFeature {
    /// The fixed clustering feature subset, in column order.
    pub const ALL: [JourneyFeature; FEATURE_DIM] = [
        JourneyFeature::NumVisits,
        JourneyFeature::JourneyDurationDays,
        JourneyFeature::AvgGapDays,
    ];

    /// Column index in a feature matrix row.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            JourneyFeature::NumVisits => 0,
            JourneyFeature::JourneyDurationDays => 1,
            JourneyFeature::AvgGapDays => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JourneyFeature::NumVisits => "num_visits",
            JourneyFeature::JourneyDurationDays => "journey_duration_days",
            JourneyFeature::AvgGapDays => "avg_gap_days",
        }
    }
}

impl fmt::Display for JourneyFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Journey-level features for one patient.
///
/// # Invariants
///
/// - `num_visits >= 1`
/// - `journey_duration_days >= 0`
/// - `avg_gap_days == 0.0` whenever `num_visits <= 1`
/// - all values finite
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub patient_id: PatientId,
    /// Encounters with a parseable start timestamp.
    pub num_visits: u32,
    /// Earliest parseable encounter start.
    pub journey_start: DateTime<Utc>,
    /// End of the journey (see `JourneyEndPolicy`).
    pub journey_end: DateTime<Utc>,
    /// Whole days between `journey_start` and `journey_end`.
    pub journey_duration_days: i64,
    /// `journey_duration_days / num_visits` for multi-visit journeys, else 0.
    pub avg_gap_days: f64,
}

impl FeatureVector {
    /// Value of a single clustering feature.
    pub fn value(&self, feature: JourneyFeature) -> f64 {
        match feature {
            JourneyFeature::NumVisits => f64::from(self.num_visits),
            JourneyFeature::JourneyDurationDays => self.journey_duration_days as f64,
            JourneyFeature::AvgGapDays => self.avg_gap_days,
        }
    }

    /// Clustering features as a matrix row, ordered as [`JourneyFeature::ALL`].
    pub fn feature_row(&self) -> [f64; FEATURE_DIM] {
        JourneyFeature::ALL.map(|f| self.value(f))
    }
}

/// A feature vector labelled with its cluster.
///
/// Labels are only meaningful within the clustering run that produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub features: FeatureVector,
    /// Cluster label in `[0, k)`.
    pub cluster: usize,
}

impl ClusterAssignment {
    #[inline]
    pub fn patient_id(&self) -> &PatientId {
        &self.features.patient_id
    }
}
