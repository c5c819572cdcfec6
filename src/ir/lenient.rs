//! Tolerant deserialization helpers for external trees.
//!
//! Input trees come from collaborators we do not control (a browser
//! extraction script, a design-tool API). One malformed child must not make
//! the whole tree unreadable, so child lists are parsed element by element
//! and bad elements are dropped with a warning.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use tracing::warn;

/// Deserializes a list, skipping elements that fail to parse.
///
/// A `null` list is treated as empty.
pub fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    let values = values.unwrap_or_default();
    let mut out = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(item) => out.push(item),
            Err(error) => warn!(index, %error, "skipping malformed child"),
        }
    }
    Ok(out)
}

/// Deserializes an optional field, treating a malformed value as absent.
pub fn or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Deserializes a flag from whatever a JavaScript extractor produced.
///
/// `true`/`false` as usual; `null` is false; strings are true when
/// non-empty; numbers are true when non-zero.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    })
}
