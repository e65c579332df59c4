use crate::record::FieldValue;
use serde::Serialize;

const CALCULUS_PATTERNS: &[&str] = &["calc", "calculus", "ap", "bc"];

const LINEAR_ALGEBRA_PATTERNS: &[&str] = &["linear", "lin ", "matrix", "vector", "matrices"];

const REAL_ANALYSIS_PATTERNS: &[&str] = &[
    "real",
    "mathematical analysis",
    "metric spaces",
    "advanced analytic",
    "grad level analysis",
    "intro to proofs",
    "analysis",
    " ra ",
    " ra,",
    "analysis 1",
    "analysis 2",
    "analysis 3",
    "analysis 4",
    "analysis i",
    "analysis ii",
    "analysis iii",
    "analysis iv",
    "analytic",
];

/// Independent coursework flags; a transcript may set any combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CourseworkFlags {
    pub calculus: bool,
    pub linear_algebra: bool,
    pub real_analysis: bool,
}

pub fn detect_coursework(courses: &FieldValue) -> CourseworkFlags {
    let Some(text) = courses.joined_lowercase() else {
        return CourseworkFlags::default();
    };
    // Padding lets the space-delimited abbreviations match at either end.
    let text = format!(" {text} ");

    CourseworkFlags {
        calculus: contains_any(&text, CALCULUS_PATTERNS),
        linear_algebra: contains_any(&text, LINEAR_ALGEBRA_PATTERNS),
        real_analysis: contains_any(&text, REAL_ANALYSIS_PATTERNS),
    }
}

pub(crate) fn contains_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| text.contains(pattern))
}
