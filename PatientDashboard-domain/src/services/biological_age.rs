use crate::entities::analytics::BiologicalAge;
use crate::entities::lab_result::LabResult;
use crate::services::classification::parse_range;

/// Baseline age the estimate is anchored to
pub const CHRONOLOGICAL_AGE: f64 = 35.0;

/// Half-width in years of the band the estimate can move within
const AGE_BAND_YEARS: f64 = 10.0;

/// Score one result between 0 and 1, where 1 means the value sits at the
/// midpoint of its range.
///
/// Results without a usable range or value score 1. A zero-width range scores
/// 1 on the bound and 0 anywhere else.
pub fn range_score(result: &LabResult) -> f64 {
    let Some((min, max)) = parse_range(&result.range) else {
        return 1.0;
    };
    if !result.value.is_finite() {
        return 1.0;
    }

    let midpoint = (min + max) / 2.0;
    let width = (max - min).abs();
    if width == 0.0 {
        return if result.value == midpoint { 1.0 } else { 0.0 };
    }

    let deviation = (result.value - midpoint).abs() / width;
    1.0 - deviation.min(1.0)
}

fn describe_age_difference(age_difference: f64) -> String {
    if age_difference <= 0.0 {
        format!(
            "Your biological age is estimated to be {:.1} years higher than your chronological age. \
             Several biomarkers sit away from the middle of their reference ranges.",
            age_difference.abs()
        )
    } else {
        format!(
            "Your biological age is estimated to be {:.1} years lower than your chronological age. \
             Most biomarkers sit close to the middle of their reference ranges.",
            age_difference
        )
    }
}

/// Estimate biological age from the whole result set.
///
/// Returns `None` for an empty set; there is no mean to take.
pub fn estimate_biological_age(results: &[LabResult]) -> Option<BiologicalAge> {
    if results.is_empty() {
        return None;
    }

    let average_score = results.iter().map(range_score).sum::<f64>() / results.len() as f64;
    let age_difference = (average_score - 0.5) * AGE_BAND_YEARS;
    let biological_age = ((CHRONOLOGICAL_AGE - age_difference) * 10.0).round() / 10.0;

    Some(BiologicalAge {
        biological_age,
        chronological_age: CHRONOLOGICAL_AGE,
        analysis: describe_age_difference(age_difference),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(value: f64, range: &str) -> LabResult {
        LabResult::new("Test", value, range, None, None)
    }

    #[test]
    fn test_empty_results_have_no_estimate() {
        assert!(estimate_biological_age(&[]).is_none());
    }

    #[test]
    fn test_value_at_bound_matches_chronological_age() {
        // |20 - 15| / 10 = 0.5, score 0.5, age difference 0
        let estimate = estimate_biological_age(&[result(20.0, "10-20")]).unwrap();
        assert_eq!(estimate.biological_age, CHRONOLOGICAL_AGE);
        assert!(estimate.analysis.contains("0.0 years higher"));
    }

    #[test]
    fn test_value_at_midpoint_lowers_age_by_five() {
        // score 1, age difference 5
        let estimate = estimate_biological_age(&[result(15.0, "10-20")]).unwrap();
        assert_eq!(estimate.biological_age, 30.0);
        assert!(estimate.analysis.contains("5.0 years lower"));
    }

    #[test]
    fn test_far_outside_range_raises_age_by_five() {
        // deviation capped at 1, score 0, age difference -5
        let estimate = estimate_biological_age(&[result(100.0, "10-20")]).unwrap();
        assert_eq!(estimate.biological_age, 40.0);
        assert!(estimate.analysis.contains("5.0 years higher"));
    }

    #[test]
    fn test_average_is_rounded_to_one_decimal() {
        // scores 0.75 and 1 (unparseable range), mean 0.875, difference 3.75
        let estimate =
            estimate_biological_age(&[result(12.5, "10-20"), result(1.0, "n/a")]).unwrap();
        assert_eq!(estimate.biological_age, 31.3);
        assert_eq!(estimate.chronological_age, 35.0);
    }

    #[test]
    fn test_range_score_edge_cases() {
        assert_eq!(range_score(&result(f64::NAN, "10-20")), 1.0);
        assert_eq!(range_score(&result(5.0, "5-5")), 1.0);
        assert_eq!(range_score(&result(6.0, "5-5")), 0.0);
        assert_eq!(range_score(&result(0.0, "-5-5")), 1.0);
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let results = vec![result(12.0, "10-20"), result(30.0, "0-25")];
        assert_eq!(estimate_biological_age(&results), estimate_biological_age(&results));
    }
}
