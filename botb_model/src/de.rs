//! Deserialization helpers for quirks of the BotB JSON payloads.
//!
//! The API is served by PHP and is not strict about value types: numbers
//! regularly come back as strings, booleans as `0`/`1` or `"false"`, and a
//! handful of fields have documented site bugs (an empty map serializes as
//! `[]`, file sizes occasionally contain stray unicode). The helpers here
//! normalize all of that at the deserialization boundary so the model structs
//! can expose plain Rust types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{Deserialize, Deserializer, Error, Unexpected};
use serde_json::Value;
use std::collections::HashMap;

/// Timestamp format used by every datetime field on the site
/// (US East Coast local time).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn int_from_value<'de, D: Deserializer<'de>>(value: &Value) -> Result<i64, D::Error> {
    match value {
        Value::Number(num) =>
            num.as_i64()
                .ok_or_else(|| D::Error::custom(format!("number {} out of range", num))),
        Value::String(s) =>
            s.trim()
                .parse()
                .map_err(|_| D::Error::invalid_value(Unexpected::Str(s), &"an integer")),
        _ => Err(D::Error::custom("expected an integer or integer string")),
    }
}

macro_rules! int_from_any {
    ($($(#[$attr:meta])* $name:ident: $int:ty),* $(,)?) => {
        $(
            $(#[$attr])*
            pub fn $name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<$int, D::Error> {
                let value = Value::deserialize(deserializer)?;
                let int = int_from_value::<D>(&value)?;

                <$int>::try_from(int).map_err(|_| D::Error::custom(format!("{} out of range", int)))
            }
        )*
    };
}

int_from_any! {
    /// Deserializes an `i64` from either a JSON number or a numeric string.
    i64_from_any: i64,
    /// Deserializes a `u64` from either a JSON number or a numeric string.
    u64_from_any: u64,
    /// Deserializes a `u32` from either a JSON number or a numeric string.
    u32_from_any: u32,
}

/// Deserializes an `f64` from either a JSON number or a numeric string.
pub fn f64_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(num) => num.as_f64().ok_or_else(|| D::Error::custom("number out of range")),
        Value::String(s) =>
            s.trim()
                .parse()
                .map_err(|_| D::Error::invalid_value(Unexpected::Str(&s), &"a float")),
        _ => Err(D::Error::custom("expected a float or float string")),
    }
}

/// Deserializes a `bool` the way the API means it: `false`, `"false"`, `0`
/// and `"0"` are false, everything else is true.
pub fn bool_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => !matches!(s.to_lowercase().as_str(), "false" | "0" | ""),
        Value::Number(num) => num.as_f64() != Some(0.0),
        Value::Null => false,
        _ => true,
    })
}

/// Deserializes a `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;

    NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT)
        .map_err(|_| D::Error::invalid_value(Unexpected::Str(&raw), &"a YYYY-MM-DD HH:MM:SS timestamp"))
}

/// Deserializes an optional `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn opt_datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) =>
            NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT)
                .map(Some)
                .map_err(|_| D::Error::invalid_value(Unexpected::Str(&raw), &"a YYYY-MM-DD HH:MM:SS timestamp")),
    }
}

/// Deserializes a `YYYY-MM-DD` date.
pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;

    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| D::Error::invalid_value(Unexpected::Str(&raw), &"a YYYY-MM-DD date"))
}

/// Deserializes an optional `u32`, coercing numeric strings.
pub fn opt_u32_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => {
            let int = int_from_value::<D>(&value)?;

            u32::try_from(int)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("{} out of range", int)))
        },
    }
}

/// Deserializes an optional `f64`, coercing numeric strings.
pub fn opt_f64_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(num) => num.as_f64().map(Some).ok_or_else(|| D::Error::custom("number out of range")),
        Value::String(s) =>
            s.trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::invalid_value(Unexpected::Str(&s), &"a float")),
        _ => Err(D::Error::custom("expected a float or float string")),
    }
}

/// Deserializes a string field where the API reports absence as the JSON
/// literal `false` instead of `null` (e.g. `play_url` on non-audio entries).
pub fn false_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(D::Error::custom("expected a string, false or null")),
    }
}

/// Deserializes a string-to-integer map.
///
/// ## BotB internals:
/// When such a map is empty the site serializes it as `[]` instead of `{}`
/// (e.g. `points_array` on fresh BotBrs), and the values themselves may be
/// numeric strings.
pub fn int_map_or_empty_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HashMap<String, i64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(values) if values.is_empty() => Ok(HashMap::new()),
        Value::Object(map) => {
            let mut out = HashMap::with_capacity(map.len());

            for (key, value) in &map {
                out.insert(key.clone(), int_from_value::<D>(value)?);
            }

            Ok(out)
        },
        _ => Err(D::Error::custom("expected a map or an empty array")),
    }
}

/// Deserializes an integer that may contain stray non-digit characters.
///
/// ## BotB internals:
/// Some `maxfilesize` values on formats are malformed and contain unicode
/// garbage around the number; only the digits are kept.
pub fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(num) => num.as_i64().ok_or_else(|| D::Error::custom("number out of range")),
        Value::String(s) => {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();

            digits
                .parse()
                .map_err(|_| D::Error::invalid_value(Unexpected::Str(&s), &"a string containing digits"))
        },
        _ => Err(D::Error::custom("expected an integer or integer string")),
    }
}

#[cfg(test)]
mod tests {
    use serde_derive::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "super::u64_from_any")]
        id: u64,
        #[serde(deserialize_with = "super::bool_from_any")]
        late: bool,
        #[serde(deserialize_with = "super::lenient_int")]
        size: i64,
    }

    #[test]
    fn coerces_stringly_typed_numbers() {
        let probe: Probe = serde_json::from_value(serde_json::json!({
            "id": "774",
            "late": "0",
            "size": "\u{a0}4194304 ",
        }))
        .unwrap();

        assert_eq!(probe.id, 774);
        assert!(!probe.late);
        assert_eq!(probe.size, 4_194_304);
    }

    #[test]
    fn empty_points_array_is_a_list() {
        let map = super::int_map_or_empty_list(&mut serde_json::Deserializer::from_str("[]")).unwrap();
        assert!(map.is_empty());

        let map =
            super::int_map_or_empty_list(&mut serde_json::Deserializer::from_str(r#"{"chiptune": "5"}"#)).unwrap();
        assert_eq!(map["chiptune"], 5);
    }
}
