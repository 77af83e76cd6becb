//! Feature extraction: composite records → journey feature vectors.
//!
//! Only encounters contribute. For each patient:
//!
//! | Feature | Definition |
//! |---------|------------|
//! | `num_visits` | encounters with a parseable `START` |
//! | `journey_start` | earliest parseable `START` |
//! | `journey_end` | chosen by [`JourneyEndPolicy`](crate::config::JourneyEndPolicy) |
//! | `journey_duration_days` | whole days from start to end |
//! | `avg_gap_days` | `duration / num_visits` if `num_visits > 1`, else 0 |
//!
//! Unparseable timestamps never raise. They are dropped from the
//! computation and surface as [`MalformedRecord`](crate::error::MalformedRecord)
//! warnings in the [`ExtractionReport`].

mod extractor;
mod report;
mod timestamp;

pub use extractor::{extract_all, extract_features, FeatureExtraction, SkipReason};
pub use report::{ExtractionReport, ExtractionStats};
pub use timestamp::parse_timestamp;
