use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::lab_result::LabResult;

/// Aggregate recommendations for the stored result set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PatientRecommendations {
    /// One sentence conditioned on the number of abnormal results
    pub clinician_summary: String,
    pub recommended_foods: Vec<String>,
    pub foods_to_limit: Vec<String>,
    pub self_care_recommendations: Vec<String>,
    pub recommended_supplements: Vec<String>,
    pub recommended_medications: Vec<String>,
}

/// Biological age estimate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BiologicalAge {
    /// Estimate rounded to one decimal place
    pub biological_age: f64,
    /// Fixed baseline age
    pub chronological_age: f64,
    /// Narrative comparing the two ages
    pub analysis: String,
}

/// Educational content shown alongside a biomarker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BiomarkerEducation {
    pub description: String,
    pub why_it_matters: String,
    #[serde(default)]
    pub causes: Vec<String>,
    #[serde(default)]
    pub foods_to_eat: Vec<String>,
    #[serde(default)]
    pub foods_to_limit: Vec<String>,
    #[serde(default)]
    pub supplements: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub additional_tests: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// One point of the display history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HistoryPoint {
    /// Period label, `YYYY-MM`
    pub date: String,
    pub value: f64,
}

/// A single lab result enriched for the detail view
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BiomarkerDetail {
    #[serde(flatten)]
    pub result: LabResult,

    #[serde(flatten)]
    pub education: BiomarkerEducation,

    /// Placeholder series derived from the current value; not measured history
    pub history: Vec<HistoryPoint>,
}
