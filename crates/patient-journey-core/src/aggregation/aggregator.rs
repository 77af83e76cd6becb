//! Grouping of flat events by patient.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::types::{CompositePatientRecord, EventKind, PatientId, RawEvent};

use super::types::{AggregationOutcome, AggregationStats, EventBatch};

/// Group events by patient into composite records.
///
/// Infallible: problems with individual rows are counted in
/// [`AggregationStats`] and logged, never raised.
pub fn aggregate_events(demographics: Vec<RawEvent>, batch: EventBatch) -> AggregationOutcome {
    let mut stats = AggregationStats::default();
    let mut records: BTreeMap<PatientId, CompositePatientRecord> = BTreeMap::new();

    for demo in demographics {
        let Some(patient_id) = demo.demographic_id() else {
            stats.missing_demographic_ids += 1;
            continue;
        };
        let record = CompositePatientRecord::new(patient_id.clone(), demo);
        if records.insert(patient_id, record).is_some() {
            stats.duplicate_demographic_ids += 1;
        }
    }

    for (kind, events) in batch.into_inner() {
        let before = stats.assigned_events;
        for event in events {
            match event.patient_id() {
                None => stats.unassigned.record(kind),
                Some(patient_id) => match records.get_mut(&patient_id) {
                    Some(record) => {
                        record.events_mut(kind).push(event);
                        stats.assigned_events += 1;
                    }
                    None => stats.orphaned.record(kind),
                },
            }
        }
        debug!(
            kind = %kind,
            assigned = stats.assigned_events - before,
            unassigned = stats.unassigned.get(kind),
            orphaned = stats.orphaned.get(kind),
            "grouped events"
        );
    }

    stats.records = records.len();
    log_anomalies(&stats);

    info!(
        records = stats.records,
        assigned_events = stats.assigned_events,
        unassigned_events = stats.unassigned.total(),
        orphaned_events = stats.orphaned.total(),
        "aggregation complete"
    );

    AggregationOutcome {
        records: records.into_values().collect(),
        stats,
    }
}

fn log_anomalies(stats: &AggregationStats) {
    for kind in EventKind::ALL {
        let unassigned = stats.unassigned.get(kind);
        if unassigned > 0 {
            warn!(kind = %kind, count = unassigned, "events without patient id left unassigned");
        }
        let orphaned = stats.orphaned.get(kind);
        if orphaned > 0 {
            warn!(kind = %kind, count = orphaned, "events reference unknown patients");
        }
    }
    if stats.missing_demographic_ids > 0 {
        warn!(
            count = stats.missing_demographic_ids,
            "demographic entries without Id skipped"
        );
    }
    if stats.duplicate_demographic_ids > 0 {
        warn!(
            count = stats.duplicate_demographic_ids,
            "duplicate demographic Ids; last entry kept"
        );
    }
}
