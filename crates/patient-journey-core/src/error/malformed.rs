//! Non-fatal record warnings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::PatientId;

/// What was wrong with a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedKind {
    /// Encounter `START` present but not a recognizable timestamp.
    UnparseableStart,
    /// Encounter `STOP` present but not a recognizable timestamp.
    UnparseableStop,
    /// Journey end precedes journey start.
    NegativeJourneySpan,
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MalformedKind::UnparseableStart => "unparseable_start",
            MalformedKind::UnparseableStop => "unparseable_stop",
            MalformedKind::NegativeJourneySpan => "negative_journey_span",
        };
        f.write_str(name)
    }
}

/// A record or value excluded from derived output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRecord {
    pub patient_id: PatientId,
    pub kind: MalformedKind,
    pub detail: String,
}

impl MalformedRecord {
    pub fn new(patient_id: PatientId, kind: MalformedKind, detail: impl Into<String>) -> Self {
        Self {
            patient_id,
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "patient {}: {} ({})", self.patient_id, self.kind, self.detail)
    }
}
