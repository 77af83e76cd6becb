//! Raw clinical events as ingested from the source collections.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::PatientId;

/// Field holding the owning patient on every clinical event.
pub const PATIENT_FIELD: &str = "PATIENT";

/// Field holding the patient identifier on demographic records.
pub const DEMOGRAPHIC_ID_FIELD: &str = "Id";

/// Encounter start timestamp field.
pub const START_FIELD: &str = "START";

/// Encounter stop timestamp field.
pub const STOP_FIELD: &str = "STOP";

/// Kind of clinical event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Encounter,
    Condition,
    Medication,
    Procedure,
    Observation,
}

impl EventKind {
    /// All event kinds in aggregation order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Encounter,
        EventKind::Condition,
        EventKind::Medication,
        EventKind::Procedure,
        EventKind::Observation,
    ];

    /// Plural collection name (`encounters`, `conditions`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Encounter => "encounters",
            EventKind::Condition => "conditions",
            EventKind::Medication => "medications",
            EventKind::Procedure => "procedures",
            EventKind::Observation => "observations",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One clinical fact stored as a field map.
///
/// Source rows carry arbitrary columns, so the event keeps all of them.
/// Blank values are treated as absent by [`RawEvent::get`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEvent {
    fields: BTreeMap<String, String>,
}

impl RawEvent {
    /// Create an empty event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an event from `(field, value)` pairs.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builder-style field insertion.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Value of `field`, or `None` when missing or blank.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Owning patient of a clinical event (`PATIENT` field).
    pub fn patient_id(&self) -> Option<PatientId> {
        self.get(PATIENT_FIELD).and_then(PatientId::parse)
    }

    /// Identifier of a demographic record (`Id` field).
    pub fn demographic_id(&self) -> Option<PatientId> {
        self.get(DEMOGRAPHIC_ID_FIELD).and_then(PatientId::parse)
    }

    /// Number of stored fields, blank ones included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the event has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
