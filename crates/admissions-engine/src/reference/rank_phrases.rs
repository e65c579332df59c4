use super::ReferenceDataError;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

const BUNDLED_RANK_PHRASES: &str = include_str!("../../data/rank_phrases.json");

pub const MAX_INFERRED_TIER: u8 = 5;

/// One step of the free-text rank cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankPhraseRule {
    pub label: String,
    pub tier: u8,
    /// The rule fires when any of these phrases is present...
    pub any: Vec<String>,
    /// ...and none of these are.
    #[serde(default)]
    pub unless: Vec<String>,
}

/// Ordered rule list; the first matching rule decides the tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankPhraseTable {
    rules: Vec<RankPhraseRule>,
}

impl RankPhraseTable {
    pub fn bundled() -> Result<Self, ReferenceDataError> {
        Self::from_reader(BUNDLED_RANK_PHRASES.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReferenceDataError> {
        let rules: Vec<RankPhraseRule> = serde_json::from_reader(reader)?;
        Self::from_rules(rules)
    }

    pub fn from_rules(rules: Vec<RankPhraseRule>) -> Result<Self, ReferenceDataError> {
        let mut validated = Vec::with_capacity(rules.len());
        for mut rule in rules {
            if !(1..=MAX_INFERRED_TIER).contains(&rule.tier) {
                return Err(ReferenceDataError::PhraseTierOutOfRange {
                    label: rule.label,
                    tier: rule.tier,
                });
            }

            rule.any = lowercase_phrases(rule.any);
            rule.unless = lowercase_phrases(rule.unless);
            if rule.any.is_empty() {
                return Err(ReferenceDataError::EmptyPhraseRule { label: rule.label });
            }
            validated.push(rule);
        }

        Ok(Self { rules: validated })
    }

    pub fn rules(&self) -> &[RankPhraseRule] {
        &self.rules
    }
}

// Leading/trailing spaces are significant (" t1"), so phrases are not trimmed.
fn lowercase_phrases(phrases: Vec<String>) -> Vec<String> {
    phrases
        .into_iter()
        .filter(|phrase| !phrase.trim().is_empty())
        .map(|phrase| phrase.to_lowercase())
        .collect()
}
