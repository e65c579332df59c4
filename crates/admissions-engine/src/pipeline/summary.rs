use super::{DataQualityIssue, NormalizedRecord};
use crate::features::AdmissionOutcome;
use crate::resolution::normalize_name;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

pub const TOP_UNMATCHED_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub offer: usize,
    pub no_offer: usize,
    pub unknown: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedInstitution {
    /// First spelling seen for this normalized name.
    pub name: String,
    pub count: usize,
}

/// Batch-level data-quality statistics for alias-table curation.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub skipped_payloads: usize,
    pub outcomes: OutcomeCounts,
    pub unranked_undergrad: usize,
    pub inferred_undergrad: usize,
    pub unmatched_graduate_entries: usize,
    pub gpa_out_of_range: usize,
    pub scores_dropped: usize,
    pub coerced_fields: usize,
    pub top_unmatched_institutions: Vec<UnmatchedInstitution>,
}

impl BatchSummary {
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let mut summary = Self {
            generated_at: Utc::now(),
            total_records: records.len(),
            skipped_payloads: 0,
            outcomes: OutcomeCounts::default(),
            unranked_undergrad: 0,
            inferred_undergrad: 0,
            unmatched_graduate_entries: 0,
            gpa_out_of_range: 0,
            scores_dropped: 0,
            coerced_fields: 0,
            top_unmatched_institutions: Vec::new(),
        };
        let mut unmatched: HashMap<String, (String, usize)> = HashMap::new();

        for normalized in records {
            match normalized.record.phd_outcome {
                AdmissionOutcome::Offer => summary.outcomes.offer += 1,
                AdmissionOutcome::NoOffer => summary.outcomes.no_offer += 1,
                AdmissionOutcome::Unknown => summary.outcomes.unknown += 1,
            }

            for issue in &normalized.issues {
                let institution = match issue {
                    DataQualityIssue::UnmatchedUndergrad { institution } => {
                        summary.unranked_undergrad += 1;
                        Some(institution)
                    }
                    DataQualityIssue::UnmatchedGraduate { institution } => {
                        summary.unmatched_graduate_entries += 1;
                        Some(institution)
                    }
                    DataQualityIssue::InferredUndergrad { .. } => {
                        summary.inferred_undergrad += 1;
                        None
                    }
                    DataQualityIssue::GpaOutOfRange { .. } => {
                        summary.gpa_out_of_range += 1;
                        None
                    }
                    DataQualityIssue::ScoreDropped { .. } => {
                        summary.scores_dropped += 1;
                        None
                    }
                    DataQualityIssue::CoercedShape { .. } => {
                        summary.coerced_fields += 1;
                        None
                    }
                };

                if let Some(institution) = institution {
                    unmatched
                        .entry(normalize_name(institution))
                        .or_insert_with(|| (institution.clone(), 0))
                        .1 += 1;
                }
            }
        }

        let mut ranked: Vec<UnmatchedInstitution> = unmatched
            .into_values()
            .map(|(name, count)| UnmatchedInstitution { name, count })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        ranked.truncate(TOP_UNMATCHED_LIMIT);
        summary.top_unmatched_institutions = ranked;

        summary
    }

    pub fn with_skipped_payloads(mut self, skipped: usize) -> Self {
        self.skipped_payloads = skipped;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RecordNormalizer;
    use crate::record::RawAttributeRecord;
    use serde_json::json;

    fn normalize_all(values: Vec<serde_json::Value>) -> Vec<NormalizedRecord> {
        let normalizer = RecordNormalizer::bundled().expect("bundled reference data loads");
        values
            .into_iter()
            .map(|value| {
                let raw: RawAttributeRecord =
                    serde_json::from_value(value).expect("raw record deserializes");
                normalizer.normalize(&raw)
            })
            .collect()
    }

    #[test]
    fn counts_outcomes_and_issues() {
        let records = normalize_all(vec![
            json!({"schools_accepted": ["Harvard"], "undergrad_institution": "Xyzzy Polytechnic"}),
            json!({"schools_applied": ["MIT"], "gre_quant": 95}),
            json!({"undergrad_institution": "top 20 school", "schools_applied": "Yale"}),
        ]);
        let summary = BatchSummary::from_records(&records).with_skipped_payloads(2);

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.skipped_payloads, 2);
        assert_eq!(
            summary.outcomes,
            OutcomeCounts {
                offer: 1,
                no_offer: 2,
                unknown: 0
            }
        );
        assert_eq!(summary.unranked_undergrad, 1);
        assert_eq!(summary.inferred_undergrad, 1);
        assert_eq!(summary.scores_dropped, 1);
        assert_eq!(summary.coerced_fields, 1);
    }

    #[test]
    fn unmatched_names_are_grouped_and_ranked() {
        let records = normalize_all(vec![
            json!({"undergrad_institution": "Xyzzy Polytechnic"}),
            json!({"undergrad_institution": "the xyzzy polytechnic"}),
            json!({"schools_accepted": ["Plugh College"]}),
        ]);
        let summary = BatchSummary::from_records(&records);

        assert_eq!(
            summary.top_unmatched_institutions,
            vec![
                UnmatchedInstitution {
                    name: "Xyzzy Polytechnic".to_string(),
                    count: 2
                },
                UnmatchedInstitution {
                    name: "Plugh College".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(summary.unmatched_graduate_entries, 1);
    }
}
