use crate::record::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ternary admission result. `Unknown` means the process status could not be
/// determined and is never folded into `NoOffer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionOutcome {
    Offer,
    NoOffer,
    #[default]
    Unknown,
}

impl AdmissionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            AdmissionOutcome::Offer => "offer",
            AdmissionOutcome::NoOffer => "no_offer",
            AdmissionOutcome::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AdmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any acceptance wins. Otherwise evidence of an application yields
/// `NoOffer`, and no evidence at all yields `Unknown`.
pub fn resolve_outcome(
    applied: &FieldValue,
    accepted: &FieldValue,
    rejected: &FieldValue,
    waitlisted: &FieldValue,
) -> AdmissionOutcome {
    if accepted.has_content() {
        AdmissionOutcome::Offer
    } else if [applied, waitlisted, rejected]
        .iter()
        .any(|field| field.has_content())
    {
        AdmissionOutcome::NoOffer
    } else {
        AdmissionOutcome::Unknown
    }
}
