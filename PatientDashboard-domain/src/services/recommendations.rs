use crate::entities::analytics::PatientRecommendations;
use crate::entities::lab_result::LabResult;

/// Summary used when every result is within range
pub const ALL_NORMAL_SUMMARY: &str =
    "Based on the lab results, your overall health indicators are within normal ranges.";

const RECOMMENDED_FOODS: [&str; 5] = [
    "Leafy greens",
    "Lean proteins",
    "Whole grains",
    "Fresh fruits",
    "Healthy fats",
];

const FOODS_TO_LIMIT: [&str; 5] = [
    "Processed foods",
    "Added sugars",
    "Saturated fats",
    "Sodium-rich foods",
    "Refined carbohydrates",
];

const SELF_CARE: [&str; 5] = [
    "30 minutes of moderate exercise daily",
    "7-8 hours of sleep per night",
    "Stress management techniques",
    "Regular hydration",
    "Mindfulness practices",
];

const SUPPLEMENTS: [&str; 5] = [
    "Vitamin D",
    "Omega-3 fatty acids",
    "Probiotics",
    "Magnesium",
    "B-complex vitamins",
];

const MEDICATIONS: [&str; 1] =
    ["Consult with your healthcare provider for personalized medication recommendations"];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Summary sentence for the given number of out-of-range results
pub fn clinician_summary(abnormal_count: usize) -> String {
    if abnormal_count == 0 {
        return ALL_NORMAL_SUMMARY.to_string();
    }

    let (noun, verb) = if abnormal_count == 1 {
        ("biomarker", "is")
    } else {
        ("biomarkers", "are")
    };
    format!(
        "Based on your lab results, {} {} {} outside the normal range. \
         Please review these results with your healthcare provider.",
        abnormal_count, noun, verb
    )
}

/// Build recommendations for a result set.
///
/// Only the summary depends on the input; the advice lists are the same for
/// every patient.
pub fn generate_recommendations(results: &[LabResult]) -> PatientRecommendations {
    let abnormal_count = results
        .iter()
        .filter(|result| result.status.is_abnormal())
        .count();

    PatientRecommendations {
        clinician_summary: clinician_summary(abnormal_count),
        recommended_foods: to_strings(&RECOMMENDED_FOODS),
        foods_to_limit: to_strings(&FOODS_TO_LIMIT),
        self_care_recommendations: to_strings(&SELF_CARE),
        recommended_supplements: to_strings(&SUPPLEMENTS),
        recommended_medications: to_strings(&MEDICATIONS),
    }
}
