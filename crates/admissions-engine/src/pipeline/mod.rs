//! Orchestrates every component into one canonical record per raw record.

mod summary;

pub use summary::{BatchSummary, OutcomeCounts, UnmatchedInstitution, TOP_UNMATCHED_LIMIT};

use crate::features::{
    categorize_letters, detect_coursework, is_econ_related, resolve_outcome, LetterProvenance,
};
use crate::record::{CanonicalFeatureRecord, FieldValue, RawAttributeRecord};
use crate::reference::{ReferenceData, ReferenceDataError};
use crate::resolution::{InstitutionRankService, UndergradResolution};
use crate::scores::{standardize_gpa, standardize_scores, GpaStandardization};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// A field-level degradation recorded while normalizing one record. None of
/// these fail the record; they feed the batch summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DataQualityIssue {
    /// Named but unrecognized; defaulted to the unranked tier.
    UnmatchedUndergrad { institution: String },
    InferredUndergrad { institution: String, rule: String, tier: u8 },
    UnmatchedGraduate { institution: String },
    GpaOutOfRange { field: &'static str, gpa: f64, out_of: f64 },
    ScoreDropped { field: &'static str, value: f64 },
    CoercedShape { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub record: CanonicalFeatureRecord,
    pub issues: Vec<DataQualityIssue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutput {
    pub records: Vec<NormalizedRecord>,
    pub summary: BatchSummary,
}

impl BatchOutput {
    pub fn canonical_records(&self) -> impl Iterator<Item = &CanonicalFeatureRecord> {
        self.records.iter().map(|normalized| &normalized.record)
    }
}

/// Stateless apart from the read-only rank service, so one instance can be
/// shared across worker threads.
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    ranks: InstitutionRankService,
}

impl RecordNormalizer {
    pub fn new(ranks: InstitutionRankService) -> Self {
        Self { ranks }
    }

    pub fn from_reference(reference: ReferenceData) -> Self {
        Self::new(InstitutionRankService::new(reference))
    }

    pub fn bundled() -> Result<Self, ReferenceDataError> {
        InstitutionRankService::bundled().map(Self::new)
    }

    pub fn ranks(&self) -> &InstitutionRankService {
        &self.ranks
    }

    pub fn normalize(&self, raw: &RawAttributeRecord) -> NormalizedRecord {
        let mut issues: Vec<DataQualityIssue> = raw
            .coerced_fields()
            .into_iter()
            .map(|field| DataQualityIssue::CoercedShape { field })
            .collect();

        let undergrad_gpa_std = standardized_gpa(
            "undergrad_gpa",
            &raw.undergrad_gpa,
            &raw.undergrad_gpa_out_of,
            &mut issues,
        );
        let grad_gpa_std =
            standardized_gpa("grad_gpa", &raw.grad_gpa, &raw.grad_gpa_out_of, &mut issues);
        let attended_grad_program =
            raw.grad_gpa.as_number().is_some() || raw.grad_institution.as_text().is_some();

        let coursework = detect_coursework(&raw.math_courses);

        let scores = standardize_scores(
            raw.gre_quant.as_number(),
            raw.gre_verbal.as_number(),
            raw.gre_writing.as_number(),
        );
        for dropped in &scores.dropped {
            debug!(field = dropped.field, value = dropped.value, "score outside every recognized scale");
            issues.push(DataQualityIssue::ScoreDropped {
                field: dropped.field,
                value: dropped.value,
            });
        }
        let scores = scores.scores;

        let grad_econ_related = (!raw.grad_major.entries().is_empty())
            .then(|| is_econ_related(&raw.grad_major));

        let letters = categorize_letters(&raw.letters_of_rec);

        let phd_outcome = resolve_outcome(
            &raw.schools_applied,
            &raw.schools_accepted,
            &raw.schools_rejected,
            &raw.schools_waitlisted,
        );

        let undergrad_name = raw.undergrad_institution.as_text();
        let undergrad = self.ranks.resolve_undergrad(undergrad_name.as_deref());
        match (&undergrad, &undergrad_name) {
            (Some(UndergradResolution::Unranked), Some(name)) => {
                issues.push(DataQualityIssue::UnmatchedUndergrad {
                    institution: name.clone(),
                });
            }
            (Some(UndergradResolution::Inferred(found)), Some(name)) => {
                issues.push(DataQualityIssue::InferredUndergrad {
                    institution: name.clone(),
                    rule: found.rule.clone(),
                    tier: found.tier,
                });
            }
            _ => {}
        }

        let graduate = self.ranks.resolve_graduate_outcome(&raw.schools_accepted);
        issues.extend(
            graduate
                .unmatched
                .into_iter()
                .map(|institution| DataQualityIssue::UnmatchedGraduate { institution }),
        );

        let record = CanonicalFeatureRecord {
            source_id: raw.source_id(),
            undergrad_gpa_std,
            grad_gpa_std,
            attended_grad_program,
            taken_calculus: coursework.calculus,
            taken_linear_algebra: coursework.linear_algebra,
            taken_real_analysis: coursework.real_analysis,
            gre_quant_std: scores.gre_quant,
            gre_verbal_std: scores.gre_verbal,
            gre_writing_std: scores.gre_writing,
            gmat_quant: scores.gmat_quant,
            gmat_verbal: scores.gmat_verbal,
            gmat_writing: scores.gmat_writing,
            undergrad_econ_related: is_econ_related(&raw.undergrad_major),
            grad_econ_related,
            academic_lor: letters == Some(LetterProvenance::Academic),
            research_lor: letters == Some(LetterProvenance::Research),
            professional_lor: letters == Some(LetterProvenance::Professional),
            phd_outcome,
            undergrad_rank: undergrad.map(|resolution| resolution.tier()),
            phd_accepted_rank: graduate.tier,
            phd_course_taken: raw.phd_course_taken.as_bool(),
            research_experience: raw.research_experience.as_bool(),
            publications: non_negative_count(&raw.publications),
            work_experience_years: non_negative_count(&raw.work_experience_years),
            funding_status: raw.funding_status.as_text(),
        };

        NormalizedRecord { record, issues }
    }

    /// Normalizes records on the current rayon pool. Output order matches
    /// input order.
    pub fn normalize_batch(&self, records: &[RawAttributeRecord]) -> BatchOutput {
        let records: Vec<NormalizedRecord> = records
            .par_iter()
            .map(|raw| self.normalize(raw))
            .collect();
        let summary = BatchSummary::from_records(&records);

        info!(
            total = summary.total_records,
            offers = summary.outcomes.offer,
            unranked_undergrad = summary.unranked_undergrad,
            unmatched_graduate = summary.unmatched_graduate_entries,
            "normalized batch"
        );

        BatchOutput { records, summary }
    }
}

fn standardized_gpa(
    field: &'static str,
    gpa: &FieldValue,
    out_of: &FieldValue,
    issues: &mut Vec<DataQualityIssue>,
) -> Option<f64> {
    match standardize_gpa(gpa.as_number(), out_of.as_number()) {
        GpaStandardization::Standardized { value } => Some(value),
        GpaStandardization::Missing => None,
        GpaStandardization::OutOfRange { gpa, out_of } => {
            debug!(field, gpa, out_of, "gpa outside its scale");
            issues.push(DataQualityIssue::GpaOutOfRange { field, gpa, out_of });
            None
        }
    }
}

fn non_negative_count(value: &FieldValue) -> Option<u32> {
    value
        .as_number()
        .filter(|number| *number >= 0.0 && *number <= f64::from(u32::MAX))
        .map(|number| number.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::AdmissionOutcome;
    use serde_json::json;

    fn normalizer() -> RecordNormalizer {
        RecordNormalizer::bundled().expect("bundled reference data loads")
    }

    fn raw(value: serde_json::Value) -> RawAttributeRecord {
        serde_json::from_value(value).expect("raw record deserializes")
    }

    #[test]
    fn empty_record_degrades_to_defaults() {
        let normalized = normalizer().normalize(&RawAttributeRecord::default());
        let record = normalized.record;

        assert_eq!(record.source_id, None);
        assert_eq!(record.undergrad_gpa_std, None);
        assert!(!record.attended_grad_program);
        assert_eq!(record.undergrad_rank, None);
        assert_eq!(record.phd_accepted_rank, None);
        assert_eq!(record.phd_outcome, AdmissionOutcome::Unknown);
        assert!(!record.academic_lor && !record.research_lor && !record.professional_lor);
        assert!(normalized.issues.is_empty());
    }

    #[test]
    fn unmatched_institutions_are_reported_not_fatal() {
        let normalized = normalizer().normalize(&raw(json!({
            "undergrad_institution": "Xyzzy Polytechnic of Nowhere",
            "schools_accepted": ["Harvard", "Nowhere Institute of Stuff"],
        })));

        assert_eq!(normalized.record.undergrad_rank, Some(5));
        assert_eq!(normalized.record.phd_accepted_rank, Some(1));
        assert!(normalized.issues.contains(&DataQualityIssue::UnmatchedUndergrad {
            institution: "Xyzzy Polytechnic of Nowhere".to_string()
        }));
        assert!(normalized.issues.contains(&DataQualityIssue::UnmatchedGraduate {
            institution: "Nowhere Institute of Stuff".to_string()
        }));
    }

    #[test]
    fn out_of_range_values_become_null_with_issue() {
        let normalized = normalizer().normalize(&raw(json!({
            "undergrad_gpa": 4.6,
            "undergrad_gpa_out_of": 4.0,
            "gre_quant": 95,
            "gre_writing": 9,
        })));

        assert_eq!(normalized.record.undergrad_gpa_std, None);
        assert_eq!(normalized.record.gre_quant_std, None);
        assert_eq!(normalized.record.gre_writing_std, None);
        let kinds: Vec<&str> = normalized
            .issues
            .iter()
            .map(|issue| match issue {
                DataQualityIssue::GpaOutOfRange { field, .. } => *field,
                DataQualityIssue::ScoreDropped { field, .. } => *field,
                other => panic!("unexpected issue {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec!["undergrad_gpa", "gre_quant", "gre_writing"]);
    }

    #[test]
    fn grad_program_and_pass_through_fields() {
        let record = normalizer()
            .normalize(&raw(json!({
                "grad_institution": "LSE",
                "grad_major": "MSc Economics",
                "phd_course_taken": "yes",
                "research_experience": false,
                "publications": "2",
                "work_experience_years": -1,
                "funding_status": "  fully funded ",
            })))
            .record;

        assert!(record.attended_grad_program);
        assert_eq!(record.grad_econ_related, Some(true));
        assert_eq!(record.phd_course_taken, Some(true));
        assert_eq!(record.research_experience, Some(false));
        assert_eq!(record.publications, Some(2));
        assert_eq!(record.work_experience_years, None);
        assert_eq!(record.funding_status.as_deref(), Some("fully funded"));
    }

    #[test]
    fn letters_set_exactly_one_flag() {
        let record = normalizer()
            .normalize(&raw(json!({"letters_of_rec": "my manager and a client"})))
            .record;
        assert!(record.professional_lor);
        assert!(!record.academic_lor);
        assert!(!record.research_lor);
    }

    #[test]
    fn batch_preserves_input_order() {
        let inputs: Vec<RawAttributeRecord> = (0..64)
            .map(|id| raw(json!({"original_post_id": format!("post-{id}")})))
            .collect();
        let output = normalizer().normalize_batch(&inputs);

        let ids: Vec<String> = output
            .canonical_records()
            .filter_map(|record| record.source_id.clone())
            .collect();
        let expected: Vec<String> = (0..64).map(|id| format!("post-{id}")).collect();
        assert_eq!(ids, expected);
        assert_eq!(output.summary.total_records, 64);
    }
}
