use std::collections::BTreeSet;

/// Foreign-language and misspelled forms of "university", longest first so a
/// shorter form never rewrites part of a longer one.
const UNIVERSITY_SPELLINGS: &[&str] = &[
    "universiteit",
    "universidad",
    "université",
    "universität",
    "universite",
    "universitat",
    "univercity",
    "univesity",
];

const INSTITUTION_SUFFIXES: &[&str] = &["university", "college", "institute", "school", "uni", "univ"];

pub const STOP_WORDS: &[&str] = &["of", "the", "at", "in", "and", "for"];

/// Canonical comparison key for an institution name.
pub fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let mut lowered = cleaned.trim().to_lowercase();
    for spelling in UNIVERSITY_SPELLINGS {
        if lowered.contains(spelling) {
            lowered = lowered.replace(spelling, "university");
        }
    }

    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.len() > 1
        && tokens
            .last()
            .is_some_and(|last| INSTITUTION_SUFFIXES.contains(last))
    {
        tokens.pop();
    }
    if tokens.len() > 1 && tokens[0] == "the" {
        tokens.remove(0);
    }

    let spaced: String = tokens
        .join(" ")
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Absent input normalizes to the empty string so comparisons stay total.
pub fn normalize_optional(value: Option<&str>) -> String {
    value.map(normalize_name).unwrap_or_default()
}

/// Tokens of a normalized name with stop-words removed.
pub(crate) fn content_tokens(normalized: &str) -> BTreeSet<&str> {
    normalized
        .split_whitespace()
        .filter(|token| !STOP_WORDS.contains(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize_name("  Harvard   UNIVERSITY  "), "harvard");
        assert_eq!(normalize_name("\u{feff}MIT"), "mit");
    }

    #[test]
    fn strips_trailing_suffix_only() {
        assert_eq!(normalize_name("University of Chicago"), "university of chicago");
        assert_eq!(normalize_name("Boston College"), "boston");
        assert_eq!(normalize_name("Bocconi Uni"), "bocconi");
        assert_eq!(normalize_name("University"), "university");
    }

    #[test]
    fn strips_leading_article() {
        assert_eq!(
            normalize_name("The Ohio State University"),
            "ohio state"
        );
        assert_eq!(normalize_name("The"), "the");
    }

    #[test]
    fn expands_foreign_spellings_of_university() {
        assert_eq!(normalize_name("Université Laval"), "university laval");
        assert_eq!(
            normalize_name("Universität Mannheim"),
            "university mannheim"
        );
        assert_eq!(normalize_name("Universiteit Leiden"), "university leiden");
    }

    #[test]
    fn replaces_punctuation_with_spaces() {
        assert_eq!(normalize_name("UT-Austin"), "ut austin");
        assert_eq!(normalize_name("St. John's"), "st john s");
        assert_eq!(normalize_name("Texas A&M"), "texas a m");
    }

    #[test]
    fn absent_input_is_empty() {
        assert_eq!(normalize_optional(None), "");
        assert_eq!(normalize_optional(Some("   ")), "");
    }

    #[test]
    fn content_tokens_drop_stop_words() {
        let tokens = content_tokens("university of california at berkeley");
        assert_eq!(
            tokens.into_iter().collect::<Vec<_>>(),
            vec!["berkeley", "california", "university"]
        );
    }
}
