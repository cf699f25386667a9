//! Lenient decoding of text fields: JSON numbers are accepted and stringified.

use serde::{de::Error, Deserialize, Deserializer};
use serde_json::Value;

/// A field value that is neither text nor a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotText;

/// `Ok(None)` for a missing or null value.
pub fn text_value(value: Option<&Value>) -> Result<Option<String>, NotText> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(NotText),
    }
}

/// `deserialize_with` helper for `String` fields; null becomes empty.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    text_value(Some(&value))
        .map(Option::unwrap_or_default)
        .map_err(|_| D::Error::custom("expected a string or a number"))
}
