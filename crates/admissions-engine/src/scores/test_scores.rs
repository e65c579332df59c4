use serde::Serialize;
use std::ops::RangeInclusive;

/// Compressed scale of the alternate test; passed through untouched.
pub const COMPRESSED_RANGE: RangeInclusive<u16> = 6..=51;
/// Modern target-test scale.
pub const MODERN_RANGE: RangeInclusive<u16> = 130..=170;
/// Anything here that is not already modern goes through the step tables.
pub const TARGET_RANGE: RangeInclusive<u16> = 130..=800;
pub const WRITING_RANGE: RangeInclusive<f64> = 0.0..=6.0;

/// Legacy 200-800 quantitative bands → modern score, highest band first.
const LEGACY_QUANT_STEPS: &[(u16, u16)] = &[
    (800, 170),
    (760, 169),
    (740, 168),
    (720, 167),
    (700, 166),
    (680, 165),
    (660, 164),
    (640, 163),
    (620, 162),
    (600, 161),
    (580, 160),
    (560, 159),
    (540, 158),
    (520, 157),
    (500, 156),
    (480, 155),
    (460, 154),
    (440, 153),
    (420, 152),
    (400, 151),
];
const LEGACY_QUANT_FLOOR: u16 = 150;

/// Verbal breakpoints differ; the legacy verbal distribution was shifted down.
const LEGACY_VERBAL_STEPS: &[(u16, u16)] = &[
    (800, 170),
    (730, 169),
    (700, 168),
    (670, 167),
    (640, 166),
    (610, 165),
    (580, 164),
    (550, 163),
    (520, 162),
    (500, 161),
    (470, 160),
    (450, 159),
    (430, 158),
    (410, 157),
    (390, 156),
    (370, 155),
    (350, 154),
];
const LEGACY_VERBAL_FLOOR: u16 = 153;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Quantitative,
    Verbal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
    /// Alternate test, compressed 6-51 scale.
    Compressed,
    /// Target test, already on the modern 130-170 scale.
    Modern,
    /// Target test, legacy scale needing conversion.
    Legacy,
}

/// Classifies a raw sub-score. `None` means missing (absent or zero) or
/// outside every recognized band.
pub fn classify_score(raw: f64) -> Option<(ScoreScale, u16)> {
    if !raw.is_finite() || raw <= 0.0 || raw > f64::from(u16::MAX) {
        return None;
    }
    let score = raw.trunc() as u16;

    if COMPRESSED_RANGE.contains(&score) {
        Some((ScoreScale::Compressed, score))
    } else if MODERN_RANGE.contains(&score) {
        Some((ScoreScale::Modern, score))
    } else if TARGET_RANGE.contains(&score) {
        Some((ScoreScale::Legacy, score))
    } else {
        None
    }
}

/// Maps a target-test score onto the modern scale. Modern scores are returned
/// unchanged, so the conversion is idempotent.
pub fn convert_to_modern(score: u16, section: Section) -> u16 {
    if MODERN_RANGE.contains(&score) {
        return score;
    }

    let (steps, floor) = match section {
        Section::Quantitative => (LEGACY_QUANT_STEPS, LEGACY_QUANT_FLOOR),
        Section::Verbal => (LEGACY_VERBAL_STEPS, LEGACY_VERBAL_FLOOR),
    };

    steps
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, scaled)| *scaled)
        .unwrap_or(floor)
}

/// Standardized sub-scores for one applicant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TestScores {
    pub gre_quant: Option<u16>,
    pub gre_verbal: Option<u16>,
    pub gre_writing: Option<f64>,
    pub gmat_quant: Option<u16>,
    pub gmat_verbal: Option<u16>,
    pub gmat_writing: Option<f64>,
}

/// A raw value that could not be placed on any scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DroppedScore {
    pub field: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreStandardization {
    pub scores: TestScores,
    pub dropped: Vec<DroppedScore>,
}

/// Detects the source test of each sub-score and converts it to its canonical
/// column. A writing score rides along with whichever test its companions
/// belong to and must sit in 0-6.
pub fn standardize_scores(
    quant: Option<f64>,
    verbal: Option<f64>,
    writing: Option<f64>,
) -> ScoreStandardization {
    let mut result = ScoreStandardization::default();
    let mut saw_compressed = false;
    let mut saw_target = false;

    for (field, raw, section) in [
        ("gre_quant", quant, Section::Quantitative),
        ("gre_verbal", verbal, Section::Verbal),
    ] {
        let Some(raw) = raw.filter(|value| *value != 0.0) else {
            continue;
        };

        match classify_score(raw) {
            Some((ScoreScale::Compressed, score)) => {
                saw_compressed = true;
                match section {
                    Section::Quantitative => result.scores.gmat_quant = Some(score),
                    Section::Verbal => result.scores.gmat_verbal = Some(score),
                }
            }
            Some((_, score)) => {
                saw_target = true;
                let converted = convert_to_modern(score, section);
                match section {
                    Section::Quantitative => result.scores.gre_quant = Some(converted),
                    Section::Verbal => result.scores.gre_verbal = Some(converted),
                }
            }
            None => result.dropped.push(DroppedScore { field, value: raw }),
        }
    }

    if let Some(raw) = writing {
        if WRITING_RANGE.contains(&raw) {
            if saw_compressed {
                result.scores.gmat_writing = Some(raw);
            }
            if saw_target {
                result.scores.gre_writing = Some(raw);
            }
        } else {
            result.dropped.push(DroppedScore {
                field: "gre_writing",
                value: raw,
            });
        }
    }

    result
}
