use crate::record::FieldValue;
use serde::{Deserialize, Serialize};

const ACADEMIC_PATTERNS: &[&str] = &[
    "professor",
    "prof ",
    " prof,",
    "prof.",
    "associate prof",
    "assistant prof",
    "lecturer",
    "instructor",
    "dean",
    "chair",
    "hod",
    "director",
    "advisor",
    "adviser",
    "thesis advisor",
    "supervisor",
    "phd",
    "dphil",
    "postdoc",
    "course",
    "class",
    "undergraduate",
    "graduate",
    "masters",
    "university",
    "college",
    "alma mater",
    " ra ",
    "research assistant",
    "research supervisor",
    "research advisor",
    "research prof",
    "thesis",
    "dissertation",
    "fed",
    "federal reserve",
    "think tank",
    "research institute",
    "imf",
    "oecd",
    "ecb",
    "co-author",
    "co-write",
    "pre-doc",
    "predoc",
    "pre-doctoral",
];

const PROFESSIONAL_PATTERNS: &[&str] = &[
    "boss",
    "supervisor",
    "manager",
    "director",
    "ceo",
    "cfo",
    "vp",
    "partner",
    "cbo",
    "cso",
    "employer",
    "work",
    "company",
    "firm",
    "industry",
    "client",
    "government",
    "agency",
    "military",
    "medical",
    "law",
    "engineering",
    "cs",
    "non-academic",
    "professional",
];

/// Where a recommendation letter comes from. Exactly one applies to any
/// non-blank description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterProvenance {
    Academic,
    /// Part of the output schema; no current rule selects it.
    Research,
    Professional,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LetterSignals {
    pub academic: usize,
    pub professional: usize,
}

pub fn letter_signals(text: &str) -> LetterSignals {
    let text = format!(" {} ", text.to_lowercase());
    LetterSignals {
        academic: count_matches(&text, ACADEMIC_PATTERNS),
        professional: count_matches(&text, PROFESSIONAL_PATTERNS),
    }
}

fn count_matches(text: &str, patterns: &[&str]) -> usize {
    patterns.iter().filter(|pattern| text.contains(*pattern)).count()
}

/// Academic wins whenever it has any signal. Text with no signal at all is
/// classified as professional.
pub fn categorize_letters(letters: &FieldValue) -> Option<LetterProvenance> {
    let text = letters.joined_lowercase()?;
    let signals = letter_signals(&text);

    if signals.academic > 0 {
        Some(LetterProvenance::Academic)
    } else {
        Some(LetterProvenance::Professional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorize(text: &str) -> Option<LetterProvenance> {
        categorize_letters(&FieldValue::text(text))
    }

    #[test]
    fn academic_signal_wins_over_professional() {
        assert_eq!(
            categorize("two from professors, one from my manager"),
            Some(LetterProvenance::Academic)
        );
    }

    #[test]
    fn professional_only_text_is_professional() {
        assert_eq!(
            categorize("my boss at the bank"),
            Some(LetterProvenance::Professional)
        );
    }

    #[test]
    fn no_signal_defaults_to_professional() {
        let signals = letter_signals("strong ones");
        assert_eq!(signals, LetterSignals::default());
        assert_eq!(categorize("strong ones"), Some(LetterProvenance::Professional));
    }

    #[test]
    fn blank_or_absent_is_uncategorized() {
        assert_eq!(categorize("   "), None);
        assert_eq!(categorize_letters(&FieldValue::Absent), None);
    }

    #[test]
    fn research_is_never_selected() {
        for text in [
            "research assistant for a prof",
            "RA supervisor at the Fed",
            "industry research lab",
            "nothing notable",
        ] {
            assert_ne!(categorize(text), Some(LetterProvenance::Research), "{text}");
        }
    }

    #[test]
    fn alma_mater_and_ra_signal_independently() {
        assert_eq!(
            categorize("someone from my alma mater"),
            Some(LetterProvenance::Academic)
        );
        assert_eq!(categorize("RA"), Some(LetterProvenance::Academic));
        assert_eq!(letter_signals("ra at a bank").academic, 1);
    }

    #[test]
    fn signals_count_distinct_patterns() {
        let signals = letter_signals("Professor and thesis advisor");
        assert!(signals.academic >= 3);
    }
}
