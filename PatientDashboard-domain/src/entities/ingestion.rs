use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::lab_result::LabResult;

/// An upload row that was rejected during ingestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MalformedRow {
    /// 1-based line number in the uploaded file
    pub line: u64,
    /// Title column as uploaded, possibly empty
    pub title: String,
    /// Why the row was rejected
    pub reason: String,
}

/// Outcome of ingesting one upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionReport {
    /// Accepted results in upload order
    pub results: Vec<LabResult>,
    /// Rows that were skipped
    pub rejected: Vec<MalformedRow>,
}

impl IngestionReport {
    /// Number of accepted results
    pub fn accepted(&self) -> usize {
        self.results.len()
    }
}
