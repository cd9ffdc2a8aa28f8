use crate::entities::lab_result::LabStatus;

/// Parse a `"<min>-<max>"` reference range into its bounds.
///
/// A single leading `-` is part of the lower bound, so `"-5-5"` parses as
/// `(-5, 5)`. Returns `None` when either bound is not a finite number.
pub fn parse_range(range: &str) -> Option<(f64, f64)> {
    let trimmed = range.trim();
    let search_from = usize::from(trimmed.starts_with('-'));
    let separator = trimmed[search_from..].find('-')? + search_from;

    let min = parse_bound(&trimmed[..separator])?;
    let max = parse_bound(&trimmed[separator + 1..])?;
    Some((min, max))
}

fn parse_bound(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|bound| bound.is_finite())
}

/// Classify a value against already parsed bounds. Bounds are inclusive.
pub fn classify_bounds(value: f64, min: f64, max: f64) -> LabStatus {
    if value < min {
        LabStatus::Low
    } else if value > max {
        LabStatus::High
    } else {
        LabStatus::Normal
    }
}

/// Classify a value against a reference range string.
///
/// An unparseable range classifies as normal. A NaN value compares false
/// against both bounds and therefore also classifies as normal.
pub fn classify(value: f64, range: &str) -> LabStatus {
    match parse_range(range) {
        Some((min, max)) => classify_bounds(value, min, max),
        None => LabStatus::Normal,
    }
}
