use serde::{Deserialize, Deserializer, Serialize};

/// Storage model for one lab result row in the flat JSON document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabResult {
    /// Human-readable test name
    pub title: String,

    /// Measured value. Non-finite values are written as `null`.
    #[serde(deserialize_with = "deserialize_measurement")]
    pub value: f64,

    /// Reference interval as written in the upload, e.g. `"10-20"`
    pub range: String,

    /// Classification recorded at ingestion time (`normal`, `high` or `low`)
    pub status: String,

    /// Measurement unit
    #[serde(default)]
    pub unit: String,

    /// Optional observation date, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

// serde_json writes NaN as null; read it back as NaN instead of failing the whole file.
fn deserialize_measurement<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
