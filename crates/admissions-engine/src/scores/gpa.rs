use serde::Serialize;

pub const CANONICAL_GPA_SCALE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GpaStandardization {
    Missing,
    Standardized { value: f64 },
    OutOfRange { gpa: f64, out_of: f64 },
}

impl GpaStandardization {
    pub fn value(&self) -> Option<f64> {
        match self {
            GpaStandardization::Standardized { value } => Some(*value),
            _ => None,
        }
    }
}

/// Rescales a GPA reported on an arbitrary scale onto 0-4.0, rounded to two
/// decimals. A GPA exceeding its own scale is rejected rather than clipped.
pub fn standardize_gpa(gpa: Option<f64>, out_of: Option<f64>) -> GpaStandardization {
    let (Some(gpa), Some(out_of)) = (gpa, out_of) else {
        return GpaStandardization::Missing;
    };

    if gpa < 0.0 || out_of <= 0.0 {
        return GpaStandardization::OutOfRange { gpa, out_of };
    }

    let scaled = round_to_hundredths(gpa / out_of * CANONICAL_GPA_SCALE);
    if scaled > CANONICAL_GPA_SCALE {
        return GpaStandardization::OutOfRange { gpa, out_of };
    }

    GpaStandardization::Standardized { value: scaled }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_point_scale_passes_through() {
        assert_eq!(standardize_gpa(Some(3.7), Some(4.0)).value(), Some(3.7));
    }

    #[test]
    fn other_scales_are_rescaled() {
        assert_eq!(standardize_gpa(Some(8.5), Some(10.0)).value(), Some(3.4));
        assert_eq!(standardize_gpa(Some(85.0), Some(100.0)).value(), Some(3.4));
        assert_eq!(standardize_gpa(Some(3.9), Some(4.3)).value(), Some(3.63));
    }

    #[test]
    fn missing_parts_are_missing() {
        assert_eq!(standardize_gpa(None, Some(4.0)), GpaStandardization::Missing);
        assert_eq!(standardize_gpa(Some(3.5), None), GpaStandardization::Missing);
    }

    #[test]
    fn impossible_values_are_out_of_range() {
        assert!(matches!(
            standardize_gpa(Some(3.5), Some(0.0)),
            GpaStandardization::OutOfRange { .. }
        ));
        assert!(matches!(
            standardize_gpa(Some(4.5), Some(4.0)),
            GpaStandardization::OutOfRange { .. }
        ));
        assert!(matches!(
            standardize_gpa(Some(-1.0), Some(4.0)),
            GpaStandardization::OutOfRange { .. }
        ));
    }
}
