use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{Content, ContentBlock};

/// Interprets a JSON value as a timestamp: integers are Unix milliseconds, strings RFC 3339
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(s) => s.parse::<DateTime<Utc>>().ok(),
        _ => None,
    }
}

/// Optional timestamp that degrades to `None` instead of rejecting the record
///
/// Log producers have written both epoch milliseconds and RFC 3339 strings; a
/// garbled timestamp should not hide an otherwise readable message.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(timestamp_from_value(&value))
}

/// Boolean flag where `null` or a non-boolean means `false`
pub fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

/// Optional string where `null`, empty strings and non-strings are `None`
pub fn deserialize_non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Builds message content from raw JSON, keeping only blocks this crate understands
pub fn content_from_value(value: Value) -> Content {
    match value {
        Value::String(text) => Content::Text(text),
        Value::Array(items) => Content::Blocks(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<ContentBlock>(item).ok())
                .filter(|block| !matches!(block, ContentBlock::Unknown))
                .collect(),
        ),
        _ => Content::default(),
    }
}
