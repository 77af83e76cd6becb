//! Domain types shared by every pipeline stage.
//!
//! - [`RawEvent`] / [`EventKind`]: schemaless clinical facts as ingested
//! - [`CompositePatientRecord`]: all events of one patient, partitioned by kind
//! - [`FeatureVector`] / [`JourneyFeature`]: journey-level numeric features
//! - [`ClusterAssignment`]: a feature vector plus its cluster label
//! - [`Collection`] / [`GenerationMeta`]: persisted collections and their
//!   active generation

mod collection;
mod events;
mod ids;
mod records;

pub use collection::{Collection, GenerationMeta};
pub use events::{
    EventKind, RawEvent, DEMOGRAPHIC_ID_FIELD, PATIENT_FIELD, START_FIELD, STOP_FIELD,
};
pub use ids::PatientId;
pub use records::{
    ClusterAssignment, CompositePatientRecord, FeatureVector, JourneyFeature, FEATURE_DIM,
};
