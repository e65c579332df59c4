use super::alias::{resolve_alias, AliasMatch};
use super::inference::{InferredRank, RankInferrer};
use super::normalizer::normalize_name;
use crate::record::FieldValue;
use crate::reference::{AliasTable, ReferenceData, ReferenceDataError};
use serde::Serialize;
use tracing::debug;

/// Tier reported for an institution that was named but not recognized.
pub const UNRANKED_TIER: u8 = 5;

/// How an undergraduate tier was decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum UndergradResolution {
    Alias(AliasMatch),
    Inferred(InferredRank),
    Unranked,
}

impl UndergradResolution {
    pub fn tier(&self) -> u8 {
        match self {
            UndergradResolution::Alias(found) => found.tier,
            UndergradResolution::Inferred(found) => found.tier,
            UndergradResolution::Unranked => UNRANKED_TIER,
        }
    }
}

/// Result of ranking a list of graduate placements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraduateResolution {
    pub tier: Option<u8>,
    pub matched: Vec<AliasMatch>,
    pub unmatched: Vec<String>,
}

/// Owns the read-only alias tables and rank cascade for the process lifetime.
#[derive(Debug, Clone)]
pub struct InstitutionRankService {
    undergraduate: AliasTable,
    graduate: AliasTable,
    inferrer: RankInferrer,
}

impl InstitutionRankService {
    pub fn new(reference: ReferenceData) -> Self {
        let inferrer = RankInferrer::new(&reference.rank_phrases);
        Self {
            undergraduate: reference.undergraduate,
            graduate: reference.graduate,
            inferrer,
        }
    }

    pub fn bundled() -> Result<Self, ReferenceDataError> {
        ReferenceData::bundled().map(Self::new)
    }

    /// `None` when no institution was named; otherwise always a tier in 1-5.
    pub fn rank_undergrad(&self, name: Option<&str>) -> Option<u8> {
        self.resolve_undergrad(name).map(|resolution| resolution.tier())
    }

    pub fn resolve_undergrad(&self, name: Option<&str>) -> Option<UndergradResolution> {
        let raw = name.map(str::trim).filter(|value| !value.is_empty())?;

        let normalized = normalize_name(raw);
        if let Some(found) = resolve_alias(&self.undergraduate, &normalized) {
            return Some(UndergradResolution::Alias(found));
        }

        if let Some(found) = self.inferrer.infer(raw) {
            debug!(institution = raw, rule = %found.rule, tier = found.tier, "undergrad tier inferred from text");
            return Some(UndergradResolution::Inferred(found));
        }

        debug!(institution = raw, "undergrad institution unmatched");
        Some(UndergradResolution::Unranked)
    }

    /// Most prestigious (numerically lowest) tier among the placements that
    /// resolve against the graduate table. Free-text inference is not used here.
    pub fn rank_graduate_outcome(&self, names: &FieldValue) -> Option<u8> {
        self.resolve_graduate_outcome(names).tier
    }

    pub fn resolve_graduate_outcome(&self, names: &FieldValue) -> GraduateResolution {
        let mut resolution = GraduateResolution::default();

        for name in names.entries() {
            match resolve_alias(&self.graduate, &normalize_name(&name)) {
                Some(found) => resolution.matched.push(found),
                None => {
                    debug!(institution = %name, "graduate placement unmatched");
                    resolution.unmatched.push(name);
                }
            }
        }

        resolution.tier = resolution.matched.iter().map(|found| found.tier).min();
        resolution
    }
}
