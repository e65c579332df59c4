use super::field::FieldValue;
use serde::Deserialize;

/// Semi-structured attributes produced by the upstream extractor for one post.
///
/// Every field tolerates absence, `null`, and the wrong container shape; unknown
/// keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawAttributeRecord {
    pub original_post_id: FieldValue,
    pub undergrad_gpa: FieldValue,
    pub undergrad_gpa_out_of: FieldValue,
    pub grad_gpa: FieldValue,
    pub grad_gpa_out_of: FieldValue,
    pub gre_quant: FieldValue,
    pub gre_verbal: FieldValue,
    pub gre_writing: FieldValue,
    pub undergrad_institution: FieldValue,
    pub grad_institution: FieldValue,
    pub undergrad_major: FieldValue,
    pub grad_major: FieldValue,
    pub math_courses: FieldValue,
    pub phd_course_taken: FieldValue,
    pub research_experience: FieldValue,
    pub publications: FieldValue,
    pub work_experience_years: FieldValue,
    pub letters_of_rec: FieldValue,
    pub schools_applied: FieldValue,
    pub schools_accepted: FieldValue,
    pub schools_rejected: FieldValue,
    pub schools_waitlisted: FieldValue,
    pub funding_status: FieldValue,
}

/// Whether a raw field is expected to carry a single value or a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpectedShape {
    Scalar,
    List,
    /// Free text that may legitimately arrive either way.
    Either,
}

impl RawAttributeRecord {
    pub(crate) fn fields(&self) -> [(&'static str, &FieldValue, ExpectedShape); 23] {
        use ExpectedShape::{Either, List, Scalar};
        [
            ("original_post_id", &self.original_post_id, Scalar),
            ("undergrad_gpa", &self.undergrad_gpa, Scalar),
            ("undergrad_gpa_out_of", &self.undergrad_gpa_out_of, Scalar),
            ("grad_gpa", &self.grad_gpa, Scalar),
            ("grad_gpa_out_of", &self.grad_gpa_out_of, Scalar),
            ("gre_quant", &self.gre_quant, Scalar),
            ("gre_verbal", &self.gre_verbal, Scalar),
            ("gre_writing", &self.gre_writing, Scalar),
            ("undergrad_institution", &self.undergrad_institution, Scalar),
            ("grad_institution", &self.grad_institution, Scalar),
            ("undergrad_major", &self.undergrad_major, Scalar),
            ("grad_major", &self.grad_major, Scalar),
            ("math_courses", &self.math_courses, Either),
            ("phd_course_taken", &self.phd_course_taken, Scalar),
            ("research_experience", &self.research_experience, Scalar),
            ("publications", &self.publications, Scalar),
            ("work_experience_years", &self.work_experience_years, Scalar),
            ("letters_of_rec", &self.letters_of_rec, Either),
            ("schools_applied", &self.schools_applied, List),
            ("schools_accepted", &self.schools_accepted, List),
            ("schools_rejected", &self.schools_rejected, List),
            ("schools_waitlisted", &self.schools_waitlisted, List),
            ("funding_status", &self.funding_status, Scalar),
        ]
    }

    /// Names of fields that arrived in a container shape other than the one
    /// their schema expects and were coerced.
    pub fn coerced_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value, shape)| match shape {
                ExpectedShape::Scalar => value.is_list(),
                ExpectedShape::List => matches!(value, FieldValue::Scalar(_)),
                ExpectedShape::Either => false,
            })
            .map(|(name, _, _)| name)
            .collect()
    }

    /// Stable join key back to the source post.
    pub fn source_id(&self) -> Option<String> {
        self.original_post_id.as_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_partial_payload_with_defaults() {
        let record: RawAttributeRecord = serde_json::from_value(json!({
            "original_post_id": 42,
            "undergrad_gpa": "3.7",
            "schools_accepted": "Harvard",
            "unexpected": {"nested": true}
        }))
        .expect("payload deserializes");

        assert_eq!(record.source_id().as_deref(), Some("42"));
        assert_eq!(record.undergrad_gpa.as_number(), Some(3.7));
        assert!(record.grad_gpa.is_absent());
        assert_eq!(record.schools_accepted.entries(), vec!["Harvard".to_string()]);
    }

    #[test]
    fn reports_fields_in_unexpected_shapes() {
        let record: RawAttributeRecord = serde_json::from_value(json!({
            "undergrad_institution": ["MIT", "Harvard"],
            "schools_applied": "Yale",
            "math_courses": "Calculus",
            "schools_rejected": []
        }))
        .expect("payload deserializes");

        assert_eq!(
            record.coerced_fields(),
            vec!["undergrad_institution", "schools_applied"]
        );
    }
}
