//! Lenient field coercion for snapshot documents
//!
//! Snapshot files are hand-edited and produced by older clients, so numeric
//! fields may arrive as numbers, numeric strings, `null`, or garbage. Every
//! helper here maps a field to a well-defined value instead of failing the
//! whole document: unparseable numbers become "unset" (`None`).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Lowest accounting year accepted at the I/O boundary
pub const MIN_YEAR: i32 = 1970;

/// Highest accounting year accepted at the I/O boundary
pub const MAX_YEAR: i32 = 2100;

/// Weight given to a week whose stored weight is missing or unparseable
pub const DEFAULT_WEEK_WEIGHT: f64 = 100.0;

/// Upper bound on a week weight or a category factor, in percent
pub const MAX_PERCENT_FACTOR: f64 = 1000.0;

/// Coerce a JSON value to a finite number
pub fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Treat a possibly-unset number as unset unless finite
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Clamp a number into `[min, max]`, mapping non-finite input to `min`
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.max(min).min(max)
    } else {
        min
    }
}

/// Clamp an accounting year into the supported range
pub fn clamp_year(year: i32) -> i32 {
    year.clamp(MIN_YEAR, MAX_YEAR)
}

/// `Option<f64>` field: number, numeric string, otherwise unset
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// `f64` field where unset means zero
pub fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.unwrap_or(0.0))
}

/// Week weight: unset falls back to [`DEFAULT_WEEK_WEIGHT`]
pub fn weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.unwrap_or(DEFAULT_WEEK_WEIGHT))
}

/// Category factor: unset falls back to neutral (100%)
pub fn factor_percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.unwrap_or(100.0))
}

/// Year field: integral part of any number, 0 when unset
pub fn year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?
        .map(|y| y.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
        .unwrap_or(0))
}

/// Week index: positive integer, 0 when unset
pub fn index<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?
        .filter(|i| *i >= 0.0)
        .map(|i| i.trunc().min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

/// String field: strings kept, numbers stringified, anything else empty
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Optional string field: empty and non-string values are unset
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = string(deserializer)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

/// List field: non-arrays become empty, unparseable items are dropped
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// List field where position matters: non-arrays become empty, and an item
/// that is not an object (or does not parse) takes the value of `{}`
pub fn positional_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };

    let empty = || serde_json::from_value::<T>(Value::Object(Map::new()));
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).or_else(|_| empty()).ok(),
            _ => empty().ok(),
        })
        .collect())
}
