use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::ingestion::{IngestionReport, MalformedRow};
use crate::entities::lab_result::LabResult;
use crate::services::classification::parse_range;

/// How rows with a bad value are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestionPolicy {
    /// Reject the row and report it
    #[default]
    Strict,
    /// Keep the row with a NaN value, which classifies as normal
    Lenient,
}

impl FromStr for IngestionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(IngestionPolicy::Strict),
            "lenient" => Ok(IngestionPolicy::Lenient),
            other => Err(format!("Unknown ingestion policy: {}", other)),
        }
    }
}

/// Errors that abort an upload before any row is looked at
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The file is not readable CSV
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// One data row of the upload, fields trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLabRow {
    /// 1-based line number in the file
    pub line: u64,
    pub title: String,
    pub value: Option<String>,
    pub range: Option<String>,
    pub unit: Option<String>,
    pub date: Option<String>,
}

fn field(record: &StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Split an uploaded CSV document into raw rows.
///
/// The first row is a header and is skipped. Columns are positional:
/// title, value, range, then optional unit and date. Blank rows are dropped.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawLabRow>, IngestionError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        rows.push(RawLabRow {
            line,
            title: record.get(0).unwrap_or_default().to_string(),
            value: field(&record, 1),
            range: field(&record, 2),
            unit: field(&record, 3),
            date: field(&record, 4),
        });
    }

    debug!("Parsed {} data rows from upload", rows.len());
    Ok(rows)
}

fn parse_measurement(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn reject(row: &RawLabRow, reason: impl Into<String>) -> MalformedRow {
    MalformedRow {
        line: row.line,
        title: row.title.clone(),
        reason: reason.into(),
    }
}

fn ingest_row(row: RawLabRow, policy: IngestionPolicy) -> Result<LabResult, MalformedRow> {
    if row.title.is_empty() && policy == IngestionPolicy::Strict {
        return Err(reject(&row, "missing title"));
    }

    let parsed = row.value.as_deref().map(|raw| (raw, parse_measurement(raw)));
    let value = match (parsed, policy) {
        (Some((_, Some(value))), _) => value,
        (_, IngestionPolicy::Lenient) => f64::NAN,
        (None, IngestionPolicy::Strict) => return Err(reject(&row, "missing value")),
        (Some((raw, None)), IngestionPolicy::Strict) => {
            return Err(reject(&row, format!("value '{}' is not a number", raw)))
        }
    };

    let range = row.range.unwrap_or_default();
    if parse_range(&range).is_none() {
        warn!(
            "Line {}: range '{}' for '{}' could not be parsed, classifying as normal",
            row.line, range, row.title
        );
    }

    Ok(LabResult::new(row.title, value, range, row.unit, row.date))
}

/// Turn raw rows into lab results, keeping upload order.
///
/// Range problems never reject a row. Value problems reject the row under
/// [`IngestionPolicy::Strict`] and become NaN under [`IngestionPolicy::Lenient`].
pub fn ingest_rows(rows: Vec<RawLabRow>, policy: IngestionPolicy) -> IngestionReport {
    let mut report = IngestionReport::default();

    for row in rows {
        match ingest_row(row, policy) {
            Ok(result) => report.results.push(result),
            Err(rejected) => {
                warn!("Line {}: rejected row '{}': {}", rejected.line, rejected.title, rejected.reason);
                report.rejected.push(rejected);
            }
        }
    }

    report
}
