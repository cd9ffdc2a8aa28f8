use std::collections::HashMap;

use crate::entities::analytics::{BiomarkerDetail, HistoryPoint};
use crate::entities::lab_result::LabResult;
use crate::services::education::EducationCatalog;

/// Period labels of the placeholder history
pub const HISTORY_LABELS: [&str; 5] = ["2022-01", "2022-06", "2023-01", "2023-06", "2024-01"];

/// Multipliers applied to the current value for each history label
pub const HISTORY_MULTIPLIERS: [f64; 5] = [0.9, 0.95, 1.1, 1.05, 1.0];

/// Normalize a biomarker identifier or title for matching.
///
/// Lowercases, treats `-` as a space and collapses whitespace.
pub fn normalize_identifier(raw: &str) -> String {
    raw.replace('-', " ")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Finds the stored result a free-text identifier refers to
pub trait BiomarkerResolver: Send + Sync {
    /// Resolve `identifier` against `results`, or `None` when nothing matches
    fn resolve<'a>(&self, results: &'a [LabResult], identifier: &str) -> Option<&'a LabResult>;
}

/// Exact normalized title match first, then a substring match in either
/// direction in stored order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FuzzyTitleResolver;

impl FuzzyTitleResolver {
    fn exact_match<'a>(results: &'a [LabResult], term: &str) -> Option<&'a LabResult> {
        // First occurrence wins for duplicate titles
        let mut index: HashMap<String, usize> = HashMap::with_capacity(results.len());
        for (position, result) in results.iter().enumerate() {
            index.entry(normalize_identifier(&result.title)).or_insert(position);
        }

        index.get(term).map(|&position| &results[position])
    }

    fn substring_match<'a>(results: &'a [LabResult], term: &str) -> Option<&'a LabResult> {
        results.iter().find(|result| {
            let title = normalize_identifier(&result.title);
            !title.is_empty() && (title.contains(term) || term.contains(title.as_str()))
        })
    }
}

impl BiomarkerResolver for FuzzyTitleResolver {
    fn resolve<'a>(&self, results: &'a [LabResult], identifier: &str) -> Option<&'a LabResult> {
        let term = normalize_identifier(identifier);
        if term.is_empty() {
            return None;
        }

        Self::exact_match(results, &term).or_else(|| Self::substring_match(results, &term))
    }
}

/// Placeholder history derived from the current value. Not measured data.
pub fn synthesize_history(value: f64) -> Vec<HistoryPoint> {
    HISTORY_LABELS
        .iter()
        .zip(HISTORY_MULTIPLIERS.iter())
        .map(|(label, multiplier)| HistoryPoint {
            date: label.to_string(),
            value: value * multiplier,
        })
        .collect()
}

/// Assemble the detail view for a resolved result
pub fn build_detail(result: &LabResult, catalog: &EducationCatalog) -> BiomarkerDetail {
    BiomarkerDetail {
        result: result.clone(),
        education: catalog.lookup(&result.title).clone(),
        history: synthesize_history(result.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<LabResult> {
        vec![
            LabResult::new("Vitamin D, 25-Hydroxy", 42.0, "30-100", None, None),
            LabResult::new("DHEA-S", 250.0, "100-400", None, None),
            LabResult::new("Total Cholesterol", 190.0, "0-200", None, None),
            LabResult::new("Cholesterol", 180.0, "0-200", None, None),
        ]
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("DHEA-S"), "dhea s");
        assert_eq!(normalize_identifier("  vitamin--d  "), "vitamin d");
        assert_eq!(normalize_identifier("Free\tT4"), "free t4");
    }

    #[test]
    fn test_resolve_hyphenated_identifier() {
        let results = results();
        let found = FuzzyTitleResolver.resolve(&results, "dhea-s").unwrap();
        assert_eq!(found.title, "DHEA-S");
    }

    #[test]
    fn test_exact_match_beats_earlier_substring_match() {
        let results = results();
        let found = FuzzyTitleResolver.resolve(&results, "cholesterol").unwrap();
        assert_eq!(found.title, "Cholesterol");
    }

    #[test]
    fn test_substring_match_either_direction() {
        let results = results();

        let found = FuzzyTitleResolver.resolve(&results, "vitamin-d").unwrap();
        assert_eq!(found.title, "Vitamin D, 25-Hydroxy");

        let found = FuzzyTitleResolver.resolve(&results, "my-dhea-s-result").unwrap();
        assert_eq!(found.title, "DHEA-S");
    }

    #[test]
    fn test_no_match() {
        let results = results();
        assert!(FuzzyTitleResolver.resolve(&results, "nonexistent-marker").is_none());
        assert!(FuzzyTitleResolver.resolve(&results, " - ").is_none());
        assert!(FuzzyTitleResolver.resolve(&[], "glucose").is_none());
    }

    #[test]
    fn test_synthesize_history() {
        let history = synthesize_history(200.0);

        let dates: Vec<&str> = history.iter().map(|point| point.date.as_str()).collect();
        assert_eq!(dates, HISTORY_LABELS.to_vec());
        assert_eq!(history[0].value, 200.0 * 0.9);
        assert_eq!(history[4].value, 200.0);
    }

    #[test]
    fn test_build_detail() {
        let result = LabResult::new("Glucose", 110.0, "70-100", Some("mg/dL".to_string()), None);
        let detail = build_detail(&result, &EducationCatalog::default());

        assert_eq!(detail.result, result);
        assert_eq!(detail.history.len(), 5);
        assert!(!detail.education.description.is_empty());
    }
}
