// Sample domain models - rows fetched from the sheet API
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row as returned by the API, before coercion
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    #[serde(default)]
    pub timestamp: Value,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Coerce a raw row. Returns `None` when either field is unusable.
    pub fn from_raw(raw: &RawSample) -> Option<Self> {
        let timestamp = parse_timestamp(&raw.timestamp)?;
        let value = coerce_value(&raw.value)?;
        Some(Self::new(timestamp, value))
    }

    pub fn to_chart_point(&self) -> ChartPoint {
        ChartPoint::new(self.timestamp.timestamp_millis(), self.value)
    }
}

/// Point handed to the chart: x is epoch millis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: i64,
    pub y: f64,
}

impl ChartPoint {
    pub fn new(x: i64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Coerce every row of one sheet, dropping the ones that can't be read
pub fn decode_rows(sheet: &str, rows: &[RawSample]) -> Vec<SamplePoint> {
    let mut points = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match SamplePoint::from_raw(row) {
            Some(point) => points.push(point),
            None => {
                tracing::warn!(
                    sheet,
                    index,
                    timestamp = %row.timestamp,
                    value = %row.value,
                    "Dropping unreadable row"
                );
            }
        }
    }
    points
}

/// Stable sort by timestamp; rows already in order keep their order
pub fn sort_chronologically(points: &mut [SamplePoint]) {
    points.sort_by_key(|p| p.timestamp);
}

fn coerce_value(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_float_prefix(s)?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Lenient float parsing: leading whitespace is skipped and trailing
/// garbage after the numeric prefix is ignored ("21.3 C" -> 21.3).
fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

fn parse_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => parse_timestamp_str(s.trim()),
        // Numeric timestamps are epoch millis
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(s) {
        return Some(time.with_timezone(&Utc));
    }

    // Zone-less timestamps are read as UTC
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
