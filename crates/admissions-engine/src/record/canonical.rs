use crate::features::AdmissionOutcome;
use serde::{Deserialize, Serialize};

/// Analysis-ready feature row produced once per raw record.
///
/// Every column is always serialized; "not determined" is written as `null`
/// (or an empty CSV cell), never by omitting the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFeatureRecord {
    pub source_id: Option<String>,
    pub undergrad_gpa_std: Option<f64>,
    pub grad_gpa_std: Option<f64>,
    pub attended_grad_program: bool,
    pub taken_calculus: bool,
    pub taken_linear_algebra: bool,
    pub taken_real_analysis: bool,
    pub gre_quant_std: Option<u16>,
    pub gre_verbal_std: Option<u16>,
    pub gre_writing_std: Option<f64>,
    pub gmat_quant: Option<u16>,
    pub gmat_verbal: Option<u16>,
    pub gmat_writing: Option<f64>,
    pub undergrad_econ_related: bool,
    pub grad_econ_related: Option<bool>,
    pub academic_lor: bool,
    pub research_lor: bool,
    pub professional_lor: bool,
    pub phd_outcome: AdmissionOutcome,
    pub undergrad_rank: Option<u8>,
    pub phd_accepted_rank: Option<u8>,
    pub phd_course_taken: Option<bool>,
    pub research_experience: Option<bool>,
    pub publications: Option<u32>,
    pub work_experience_years: Option<u32>,
    pub funding_status: Option<String>,
}
