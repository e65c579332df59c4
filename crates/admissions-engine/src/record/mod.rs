//! Input and output record shapes.

mod canonical;
mod field;
mod raw;

pub use canonical::CanonicalFeatureRecord;
pub use field::{FieldValue, Scalar};
pub use raw::RawAttributeRecord;
