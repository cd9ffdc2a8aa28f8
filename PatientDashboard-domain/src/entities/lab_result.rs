use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::services::classification::classify;

/// Unit recorded when the upload does not carry one
pub const DEFAULT_UNIT: &str = "N/A";

/// Classification of a value against its reference range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum LabStatus {
    /// Within the reference range, bounds included
    Normal,
    /// Above the upper bound
    High,
    /// Below the lower bound
    Low,
}

impl LabStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            LabStatus::Normal => "normal",
            LabStatus::High => "high",
            LabStatus::Low => "low",
        }
    }

    /// Whether the result falls outside its range
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, LabStatus::Normal)
    }
}

impl fmt::Display for LabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(LabStatus::Normal),
            "high" => Ok(LabStatus::High),
            "low" => Ok(LabStatus::Low),
            other => Err(format!("Unknown lab status: {}", other)),
        }
    }
}

/// One measured biomarker observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LabResult {
    /// Human-readable test name, used as the lookup key (not unique)
    pub title: String,

    /// Measured value; `null` on the wire when the upload value was not a number
    pub value: f64,

    /// Reference interval, `"<min>-<max>"`
    pub range: String,

    /// Derived from `value` and `range`
    pub status: LabStatus,

    /// Measurement unit
    pub unit: String,

    /// Observation date, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl LabResult {
    /// Build a result, deriving `status` from `value` and `range`.
    pub fn new(
        title: impl Into<String>,
        value: f64,
        range: impl Into<String>,
        unit: Option<String>,
        date: Option<String>,
    ) -> Self {
        let range = range.into();
        let status = classify(value, &range);

        Self {
            title: title.into(),
            value,
            range,
            status,
            unit: unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_status() {
        let low = LabResult::new("Vitamin D", 18.0, "30-100", Some("ng/mL".to_string()), None);
        assert_eq!(low.status, LabStatus::Low);
        assert_eq!(low.unit, "ng/mL");

        let high = LabResult::new("LDL", 160.0, "0-100", None, Some("2024-01-10".to_string()));
        assert_eq!(high.status, LabStatus::High);
        assert_eq!(high.unit, DEFAULT_UNIT);
        assert_eq!(high.date.as_deref(), Some("2024-01-10"));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&LabStatus::High).unwrap();
        assert_eq!(json, "\"high\"");
        assert_eq!("LOW".parse::<LabStatus>().unwrap(), LabStatus::Low);
        assert!("borderline".parse::<LabStatus>().is_err());
        assert!(LabStatus::Low.is_abnormal());
        assert!(!LabStatus::Normal.is_abnormal());
    }
}
