//! Aggregation inputs and outputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{CompositePatientRecord, EventKind, RawEvent};

/// The five event collections feeding one aggregation run.
#[derive(Clone, Debug, Default)]
pub struct EventBatch {
    events: BTreeMap<EventKind, Vec<RawEvent>>,
}

impl EventBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the events of one kind.
    pub fn insert(&mut self, kind: EventKind, events: Vec<RawEvent>) {
        self.events.insert(kind, events);
    }

    /// Builder-style [`EventBatch::insert`].
    #[must_use]
    pub fn with(mut self, kind: EventKind, events: Vec<RawEvent>) -> Self {
        self.insert(kind, events);
        self
    }

    /// Events of one kind (empty if never inserted).
    pub fn events(&self, kind: EventKind) -> &[RawEvent] {
        self.events.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total events across all kinds.
    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_inner(self) -> BTreeMap<EventKind, Vec<RawEvent>> {
        self.events
    }
}

/// Per-kind event counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTally {
    counts: BTreeMap<EventKind, usize>,
}

impl EventTally {
    pub(crate) fn record(&mut self, kind: EventKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    /// Count for one kind.
    pub fn get(&self, kind: EventKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Count across all kinds.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Counters describing one aggregation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationStats {
    /// Composite records produced.
    pub records: usize,
    /// Events embedded into some record.
    pub assigned_events: usize,
    /// Events with a missing or blank `PATIENT` field.
    pub unassigned: EventTally,
    /// Events whose patient has no demographic entry.
    pub orphaned: EventTally,
    /// Demographic entries without an `Id`.
    pub missing_demographic_ids: usize,
    /// Demographic entries whose `Id` was already seen; the last one wins.
    pub duplicate_demographic_ids: usize,
}

/// Records plus run statistics.
#[derive(Clone, Debug, Default)]
pub struct AggregationOutcome {
    /// Composite records ordered by patient id.
    pub records: Vec<CompositePatientRecord>,
    pub stats: AggregationStats,
}
