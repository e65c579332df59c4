//! Static reference data: the two alias tables and the rank-phrase cascade.
//!
//! Defaults are compiled into the crate; each table can be replaced by an
//! external file so aliases can be corrected without a code change. Tables are
//! loaded once and never mutated afterwards.

mod alias_table;
mod rank_phrases;

pub use alias_table::{AliasEntry, AliasTable, AliasTableKind, MAX_ALIAS_TIER, MIN_ALIAS_TIER};
pub use rank_phrases::{RankPhraseRule, RankPhraseTable, MAX_INFERRED_TIER};

use crate::config::ReferenceConfig;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference data from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {table} alias table: {source}")]
    Csv {
        table: AliasTableKind,
        #[source]
        source: csv::Error,
    },
    #[error("{table} alias table has a blank alias on line {line}")]
    EmptyAlias { table: AliasTableKind, line: usize },
    #[error("{table} alias '{alias}' has tier {tier}; tiers must be 1-4")]
    AliasTierOutOfRange {
        table: AliasTableKind,
        alias: String,
        tier: u8,
    },
    #[error("{table} alias '{alias}' is mapped to tier {first} and tier {second}")]
    ConflictingAlias {
        table: AliasTableKind,
        alias: String,
        first: u8,
        second: u8,
    },
    #[error("malformed rank phrase rules: {0}")]
    PhraseJson(#[from] serde_json::Error),
    #[error("rank phrase rule '{label}' has tier {tier}; tiers must be 1-5")]
    PhraseTierOutOfRange { label: String, tier: u8 },
    #[error("rank phrase rule '{label}' lists no phrases")]
    EmptyPhraseRule { label: String },
}

/// Everything the resolution layer needs, loaded together.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub undergraduate: AliasTable,
    pub graduate: AliasTable,
    pub rank_phrases: RankPhraseTable,
}

impl ReferenceData {
    pub fn bundled() -> Result<Self, ReferenceDataError> {
        Self::load(&ReferenceConfig::default())
    }

    /// Loads each table from its configured override path, falling back to the
    /// bundled copy.
    pub fn load(config: &ReferenceConfig) -> Result<Self, ReferenceDataError> {
        let undergraduate = match &config.undergraduate_aliases {
            Some(path) => AliasTable::from_path(AliasTableKind::Undergraduate, path)?,
            None => AliasTable::bundled(AliasTableKind::Undergraduate)?,
        };
        let graduate = match &config.graduate_aliases {
            Some(path) => AliasTable::from_path(AliasTableKind::Graduate, path)?,
            None => AliasTable::bundled(AliasTableKind::Graduate)?,
        };
        let rank_phrases = match &config.rank_phrases {
            Some(path) => RankPhraseTable::from_path(path)?,
            None => RankPhraseTable::bundled()?,
        };

        info!(
            undergraduate_aliases = undergraduate.len(),
            graduate_aliases = graduate.len(),
            rank_rules = rank_phrases.rules().len(),
            "reference data loaded"
        );

        Ok(Self {
            undergraduate,
            graduate,
            rank_phrases,
        })
    }
}
