//! Institution name resolution: normalization, alias lookup, free-text rank
//! inference, and the rank service composing them.

pub mod alias;
pub mod inference;
pub mod normalizer;
mod service;

pub use alias::{resolve_alias, AliasMatch, MatchKind, AMBIGUOUS_WORDS};
pub use inference::{InferredRank, RankInferrer};
pub use normalizer::{normalize_name, normalize_optional};
pub use service::{GraduateResolution, InstitutionRankService, UndergradResolution, UNRANKED_TIER};
