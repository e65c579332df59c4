use crate::reference::{RankPhraseRule, RankPhraseTable};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferredRank {
    pub tier: u8,
    pub rule: String,
}

/// Fallback tier inference from self-descriptions such as "top 15 public".
#[derive(Debug, Clone)]
pub struct RankInferrer {
    rules: Vec<RankPhraseRule>,
}

impl RankInferrer {
    pub fn new(table: &RankPhraseTable) -> Self {
        Self {
            rules: table.rules().to_vec(),
        }
    }

    /// Returns the tier of the first rule in cascade order that fires.
    pub fn infer(&self, text: &str) -> Option<InferredRank> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let haystack = format!(" {} ", trimmed.to_lowercase());

        self.rules
            .iter()
            .find(|rule| {
                rule.any.iter().any(|phrase| phrase_present(&haystack, phrase))
                    && !rule
                        .unless
                        .iter()
                        .any(|phrase| phrase_present(&haystack, phrase))
            })
            .map(|rule| InferredRank {
                tier: rule.tier,
                rule: rule.label.clone(),
            })
    }
}

/// Substring presence, except that a phrase ending in a digit must not be
/// followed by another digit ("top 5" does not fire on "top 50").
fn phrase_present(haystack: &str, phrase: &str) -> bool {
    let ends_in_digit = phrase.chars().last().is_some_and(|c| c.is_ascii_digit());
    if !ends_in_digit {
        return haystack.contains(phrase);
    }

    haystack.match_indices(phrase).any(|(start, matched)| {
        !haystack[start + matched.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    })
}
