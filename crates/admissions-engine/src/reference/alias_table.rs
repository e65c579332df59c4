use super::ReferenceDataError;
use crate::resolution::normalizer::{content_tokens, normalize_name};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const BUNDLED_UNDERGRADUATE: &str = include_str!("../../data/undergrad_aliases.csv");
const BUNDLED_GRADUATE: &str = include_str!("../../data/graduate_aliases.csv");

pub const MIN_ALIAS_TIER: u8 = 1;
pub const MAX_ALIAS_TIER: u8 = 4;

/// Which prestige table an alias set describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AliasTableKind {
    Undergraduate,
    Graduate,
}

impl fmt::Display for AliasTableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasTableKind::Undergraduate => write!(f, "undergraduate"),
            AliasTableKind::Graduate => write!(f, "graduate"),
        }
    }
}

/// One normalized alias with its stop-word-free token set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub alias: String,
    pub tier: u8,
    pub(crate) tokens: Vec<String>,
}

/// Immutable alias → tier mapping. Declaration order is preserved because the
/// token-subset fallback returns the first structural match.
#[derive(Debug, Clone)]
pub struct AliasTable {
    kind: AliasTableKind,
    entries: Vec<AliasEntry>,
    exact: HashMap<String, u8>,
}

#[derive(Debug, Deserialize)]
struct AliasRow {
    alias: String,
    tier: u8,
}

impl AliasTable {
    pub fn bundled(kind: AliasTableKind) -> Result<Self, ReferenceDataError> {
        let source = match kind {
            AliasTableKind::Undergraduate => BUNDLED_UNDERGRADUATE,
            AliasTableKind::Graduate => BUNDLED_GRADUATE,
        };
        Self::from_reader(kind, source.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(
        kind: AliasTableKind,
        path: P,
    ) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(kind, file)
    }

    /// Reads `alias,tier` rows. Aliases are normalized on load; two spellings
    /// that normalize to the same key must agree on the tier.
    pub fn from_reader<R: Read>(kind: AliasTableKind, reader: R) -> Result<Self, ReferenceDataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut entries = Vec::new();
        let mut exact: HashMap<String, u8> = HashMap::new();

        for (index, row) in csv_reader.deserialize::<AliasRow>().enumerate() {
            let row = row.map_err(|source| ReferenceDataError::Csv { table: kind, source })?;
            let line = index + 2;

            if !(MIN_ALIAS_TIER..=MAX_ALIAS_TIER).contains(&row.tier) {
                return Err(ReferenceDataError::AliasTierOutOfRange {
                    table: kind,
                    alias: row.alias,
                    tier: row.tier,
                });
            }

            let alias = normalize_name(&row.alias);
            if alias.is_empty() {
                return Err(ReferenceDataError::EmptyAlias { table: kind, line });
            }

            if let Some(&existing) = exact.get(&alias) {
                if existing != row.tier {
                    return Err(ReferenceDataError::ConflictingAlias {
                        table: kind,
                        alias,
                        first: existing,
                        second: row.tier,
                    });
                }
                continue;
            }

            let tokens = content_tokens(&alias)
                .into_iter()
                .map(str::to_string)
                .collect();
            exact.insert(alias.clone(), row.tier);
            entries.push(AliasEntry {
                alias,
                tier: row.tier,
                tokens,
            });
        }

        debug!(table = %kind, aliases = entries.len(), "alias table loaded");
        Ok(Self {
            kind,
            entries,
            exact,
        })
    }

    pub fn kind(&self) -> AliasTableKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exact(&self, normalized: &str) -> Option<u8> {
        self.exact.get(normalized).copied()
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }
}
