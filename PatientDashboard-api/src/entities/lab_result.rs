use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use patient_dashboard_domain::entities::{IngestionReport, MalformedRow};

/// Body returned after a successful upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Human-readable outcome
    pub message: String,
    /// Number of results now stored
    pub count: usize,
    /// Rows left out of the stored collection
    pub rejected: Vec<MalformedRow>,
}

impl From<IngestionReport> for UploadResponse {
    fn from(report: IngestionReport) -> Self {
        let count = report.accepted();
        let message = if report.rejected.is_empty() {
            "Lab results uploaded successfully".to_string()
        } else {
            format!(
                "Lab results uploaded with {} row(s) rejected",
                report.rejected.len()
            )
        };

        Self {
            message,
            count,
            rejected: report.rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_dashboard_domain::entities::LabResult;

    #[test]
    fn test_upload_response_from_report() {
        let report = IngestionReport {
            results: vec![LabResult::new("Glucose", 90.0, "70-100", None, None)],
            rejected: vec![MalformedRow {
                line: 3,
                title: "Iron".to_string(),
                reason: "missing value".to_string(),
            }],
        };

        let response = UploadResponse::from(report);
        assert_eq!(response.count, 1);
        assert_eq!(response.rejected.len(), 1);
        assert!(response.message.contains("1 row(s) rejected"));
    }
}
