//! Boundary coercions between edge-store and primary-store value shapes.
//!
//! The edge store is SQLite-flavored: booleans are stored as 0/1 integers and
//! timestamps as text. These named functions are the only place those
//! representations are translated, so the engine itself only ever sees typed
//! values.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// SQLite text timestamp format produced by `datetime('now')`.
const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Coerce a boolean-like edge value (0/1 integer, JSON bool, or null) to bool.
#[must_use]
pub fn int_to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

/// Coerce a bool to the 0/1 integer representation used by the edge store.
#[must_use]
pub fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

/// Coerce a nullable integer edge value to a point balance, null → 0.
#[must_use]
pub fn points_or_zero(value: &Value) -> i32 {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(0)
}

/// Extract a nullable string field.
#[must_use]
pub fn opt_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Parse a nullable edge timestamp (RFC 3339 or SQLite text form) to UTC.
///
/// Returns `Ok(None)` for null/absent values and an error message for text
/// that is present but unparseable.
pub fn parse_timestamp(value: &Value) -> Result<Option<DateTime<Utc>>, String> {
    let Some(text) = value.as_str() else {
        return Ok(None);
    };
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(text, SQLITE_DATETIME_FORMAT)
        .map(|naive| Some(naive.and_utc()))
        .map_err(|_| format!("Unparseable timestamp: {text}"))
}

/// Format a nullable UTC timestamp for the edge store.
#[must_use]
pub fn format_timestamp(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|ts| ts.to_rfc3339())
}
