//! Lenient ISO-8601 timestamp parsing for request bodies.
//!
//! Clients send either RFC 3339 values (`2025-03-01T09:00:00Z`,
//! `2025-03-01T10:00:00+01:00`) or naive values without an offset
//! (`2025-03-01T09:00:00.250`). Naive values are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::Error, Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_field<E: Error>(value: &str) -> Result<DateTime<Utc>, E> {
    parse(value).ok_or_else(|| E::custom(format!("invalid ISO-8601 timestamp: {value}")))
}

/// Required timestamp field.
pub fn required<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_field(&raw)
}

/// Optional timestamp field; `null` and the empty string both mean "absent".
/// Pair with `#[serde(default)]`.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_field(&raw).map(Some),
        _ => Ok(None),
    }
}

/// Patch field: the outer `Option` records whether the key was present at all,
/// the inner one whether it carried a value. Pair with `#[serde(default)]`.
pub fn patch<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional(deserializer).map(Some)
}
