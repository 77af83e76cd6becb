//! Batch extraction report.

use serde::{Deserialize, Serialize};

use crate::error::MalformedRecord;
use crate::types::FeatureVector;

/// Counters for one extraction run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Composite records examined.
    pub processed: usize,
    /// Feature vectors produced.
    pub extracted: usize,
    /// Records without any encounter.
    pub skipped_no_encounters: usize,
    /// Records whose encounters carry no parseable `START`.
    pub skipped_no_parseable_start: usize,
    /// Records excluded by [`NegativeSpanPolicy::Reject`](crate::config::NegativeSpanPolicy::Reject).
    pub rejected: usize,
    /// Present but unparseable `START` values.
    pub unparseable_starts: usize,
    /// Present but unparseable `STOP` values.
    pub unparseable_stops: usize,
}

impl ExtractionStats {
    /// Records that produced no vector.
    pub fn skipped(&self) -> usize {
        self.skipped_no_encounters + self.skipped_no_parseable_start
    }
}

/// Vectors plus everything that was dropped on the way.
#[derive(Clone, Debug, Default)]
pub struct ExtractionReport {
    /// One vector per patient with a parseable encounter start.
    pub vectors: Vec<FeatureVector>,
    pub stats: ExtractionStats,
    /// Unparseable values and rejected records, in encounter order.
    pub warnings: Vec<MalformedRecord>,
}
