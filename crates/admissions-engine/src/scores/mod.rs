//! Numeric standardization: GPA rescaling and test-score scale detection.

mod gpa;
mod test_scores;

pub use gpa::{standardize_gpa, GpaStandardization, CANONICAL_GPA_SCALE};
pub use test_scores::{
    classify_score, convert_to_modern, standardize_scores, DroppedScore, ScoreScale,
    ScoreStandardization, Section, TestScores,
};
