use super::normalizer::content_tokens;
use crate::reference::AliasTable;
use serde::Serialize;

/// Single-word aliases that also occur inside unrelated institution names
/// ("chicago" in "loyola university chicago"). They only match a query that
/// reduces to exactly that word.
pub const AMBIGUOUS_WORDS: &[&str] = &["chicago", "illinois", "columbia", "washington", "texas"];

/// Normalized keys this short are never fuzzy-matched.
const MAX_UNSAFE_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Token,
}

/// Which alias decided a lookup, kept for auditing resolutions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasMatch {
    pub tier: u8,
    pub alias: String,
    pub kind: MatchKind,
}

/// Looks up an already-normalized name in `table`.
///
/// Exact key hits win outright. Otherwise the first alias in declaration order
/// whose tokens are covered by the query's tokens is returned; ties are not
/// broken by specificity.
pub fn resolve_alias(table: &AliasTable, normalized: &str) -> Option<AliasMatch> {
    if let Some(tier) = table.exact(normalized) {
        return Some(AliasMatch {
            tier,
            alias: normalized.to_string(),
            kind: MatchKind::Exact,
        });
    }

    if normalized.chars().count() <= MAX_UNSAFE_LENGTH {
        return None;
    }

    let query = content_tokens(normalized);
    if query.is_empty() {
        return None;
    }

    table
        .entries()
        .iter()
        .filter(|entry| entry.alias.chars().count() > MAX_UNSAFE_LENGTH)
        .find(|entry| match entry.tokens.as_slice() {
            [] => false,
            [word] if AMBIGUOUS_WORDS.contains(&word.as_str()) => {
                query.len() == 1 && query.contains(word.as_str())
            }
            [word] => query.contains(word.as_str()),
            words => words.iter().all(|word| query.contains(word.as_str())),
        })
        .map(|entry| AliasMatch {
            tier: entry.tier,
            alias: entry.alias.clone(),
            kind: MatchKind::Token,
        })
}
