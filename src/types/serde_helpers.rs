//! Custom serde deserializers for flexible type handling
//!
//! The mobile API is loose about scalar types: numeric ids arrive as JSON
//! numbers in some endpoints and as strings in others, and boolean flags
//! occasionally arrive as `0`/`1`.

use serde::{Deserialize, Deserializer, de};

/// Deserialize a flexible boolean value that can be:
/// - JSON boolean: `true`, `false`
/// - Integer: `0` (false), any positive integer (true)
/// - String: `"0"`, `"1"`, `"false"`, `"true"` (case-insensitive)
///
/// A missing or null value maps to `None`.
pub fn deserialize_flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleBool {
        Bool(bool),
        Int(i64),
        String(String),
    }

    let value: Option<FlexibleBool> = Option::deserialize(deserializer)?;

    match value {
        None => Ok(None),
        Some(FlexibleBool::Bool(b)) => Ok(Some(b)),
        Some(FlexibleBool::Int(i)) => Ok(Some(i > 0)),
        Some(FlexibleBool::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(de::Error::custom(format!("invalid boolean string: {}", s))),
        },
    }
}

/// Deserialize a numeric account id sent either as a JSON number or as a
/// decimal string.
pub fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleId {
        Int(u64),
        String(String),
    }

    match FlexibleId::deserialize(deserializer)? {
        FlexibleId::Int(id) => Ok(id),
        FlexibleId::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid account id: {}", s))),
    }
}

/// Deserialize an optional pagination cursor that may be a string or a
/// number. Absent, null and empty values all mean "no further page".
pub fn deserialize_optional_cursor<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cursor {
        Int(u64),
        String(String),
    }

    let value: Option<Cursor> = Option::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(Cursor::Int(n)) => Some(n.to_string()),
        Some(Cursor::String(s)) if s.is_empty() => None,
        Some(Cursor::String(s)) => Some(s),
    })
}
