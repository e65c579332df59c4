//! Normalization and entity-resolution engine for admissions narratives.
//!
//! Raw extractor records go in through [`ingest`], are turned into
//! [`CanonicalFeatureRecord`]s by [`RecordNormalizer`], and leave through
//! [`export`]. Institution ranks come from [`InstitutionRankService`], backed by
//! the read-only tables in [`reference`].

pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod ingest;
pub mod pipeline;
pub mod record;
pub mod reference;
pub mod resolution;
pub mod scores;
pub mod telemetry;

pub use features::AdmissionOutcome;
pub use pipeline::{BatchOutput, BatchSummary, DataQualityIssue, NormalizedRecord, RecordNormalizer};
pub use record::{CanonicalFeatureRecord, FieldValue, RawAttributeRecord};
pub use reference::ReferenceData;
pub use resolution::InstitutionRankService;
