//! Keyword classifiers over free-text attributes plus the outcome resolver.

pub mod coursework;
pub mod letters;
pub mod major;
pub mod outcome;

pub use coursework::{detect_coursework, CourseworkFlags};
pub use letters::{categorize_letters, letter_signals, LetterProvenance, LetterSignals};
pub use major::is_econ_related;
pub use outcome::{resolve_outcome, AdmissionOutcome};
