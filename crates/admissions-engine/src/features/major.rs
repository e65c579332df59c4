use super::coursework::contains_any;
use crate::record::FieldValue;

const ECON_RELATED_PATTERNS: &[&str] = &[
    "economics",
    "accounting",
    "finance",
    "actuarial",
    "business",
    "econ",
    "eco",
    "b.b.a",
    "bba",
    "commerce",
    "management",
];

/// Whether a major belongs to the economics/business family.
pub fn is_econ_related(major: &FieldValue) -> bool {
    major
        .joined_lowercase()
        .is_some_and(|text| contains_any(&text, ECON_RELATED_PATTERNS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_economics_family() {
        for major in ["Economics", "Applied Econ", "B.B.A. Finance", "Commerce", "Actuarial Science"] {
            assert!(is_econ_related(&FieldValue::text(major)), "{major}");
        }
    }

    #[test]
    fn unrelated_or_missing_major_is_false() {
        assert!(!is_econ_related(&FieldValue::text("Physics")));
        assert!(!is_econ_related(&FieldValue::text("  ")));
        assert!(!is_econ_related(&FieldValue::Absent));
    }

    #[test]
    fn double_major_lists_are_joined() {
        assert!(is_econ_related(&FieldValue::list(["Mathematics", "Economics"])));
    }
}
