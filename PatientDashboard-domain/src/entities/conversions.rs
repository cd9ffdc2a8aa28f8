use tracing::debug;

use crate::entities::lab_result::LabResult;
use patient_dashboard_data::models::lab_result::LabResult as DataLabResult;

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert from data model to domain entity for a lab result.
///
/// The stored status string is ignored and re-derived from value and range,
/// so a hand-edited document cannot disagree with the classifier.
pub fn convert_to_domain_result(data_result: DataLabResult) -> LabResult {
    let stored_status = data_result.status;
    let result = LabResult::new(
        data_result.title,
        data_result.value,
        data_result.range,
        Some(data_result.unit).filter(|unit| !unit.trim().is_empty()),
        data_result.date,
    );

    if !stored_status.eq_ignore_ascii_case(result.status.as_str()) {
        debug!(
            "Stored status '{}' for '{}' replaced with '{}'",
            stored_status, result.title, result.status
        );
    }
    result
}

/// Convert from domain entity to data model for a lab result
pub fn convert_to_data_result(domain_result: &LabResult) -> DataLabResult {
    DataLabResult {
        title: domain_result.title.clone(),
        value: domain_result.value,
        range: domain_result.range.clone(),
        status: domain_result.status.to_string(),
        unit: domain_result.unit.clone(),
        date: domain_result.date.clone(),
    }
}
