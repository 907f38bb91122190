//! Primitive coercions for loosely-typed JSON fields.
//!
//! Every helper returns a default (or `None`) instead of an error: the API is
//! inconsistent about numbers vs. strings, and a bad field must never take
//! down a whole listing.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

/// First of `keys` present on `value` with a non-null value.
pub fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let object = value.as_object()?;
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|v| !v.is_null())
}

/// Render a scalar as text. Arrays are joined with `, `; objects are
/// serialized compactly; null becomes the empty string.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Text of the first present field, or the empty string.
pub fn text(value: &Value, keys: &[&str]) -> String {
    field(value, keys).map(display_value).unwrap_or_default()
}

/// Text of the first present field, `None` when absent or blank.
pub fn opt_text(value: &Value, keys: &[&str]) -> Option<String> {
    Some(text(value, keys)).filter(|s| !s.is_empty())
}

/// Coerce a JSON number or numeric string into a [`Decimal`].
///
/// Thousands separators and surrounding whitespace in strings are ignored.
#[must_use]
pub fn lenient_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let repr = n.to_string();
            Decimal::from_str(&repr)
                .or_else(|_| Decimal::from_scientific(&repr))
                .ok()
        }
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return None;
            }
            Decimal::from_str(&cleaned)
                .or_else(|_| Decimal::from_scientific(&cleaned))
                .ok()
        }
        _ => None,
    }
}

/// Decimal of the first present field.
pub fn decimal(value: &Value, keys: &[&str]) -> Option<Decimal> {
    field(value, keys).and_then(lenient_decimal)
}

/// Non-negative count, clamped into `u32`. Negative and fractional inputs
/// are truncated toward zero.
#[must_use]
pub fn lenient_count(value: &Value) -> Option<u32> {
    let number = lenient_decimal(value)?.trunc();
    if number.is_sign_negative() {
        return Some(0);
    }
    Some(number.to_u32().unwrap_or(u32::MAX))
}

/// Count of the first present field, zero when absent.
pub fn count(value: &Value, keys: &[&str]) -> u32 {
    field(value, keys).and_then(lenient_count).unwrap_or(0)
}

/// Boolean from `true`/`false`, `1`/`0`, or `"yes"`/`"true"`/`"1"`.
#[must_use]
pub fn lenient_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "on" => Some(true),
            "0" | "false" | "no" | "n" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Flag of the first present field.
pub fn flag(value: &Value, keys: &[&str]) -> Option<bool> {
    field(value, keys).and_then(lenient_flag)
}

/// Integer id of the first present field (number or numeric string).
pub fn id<T: From<i64>>(value: &Value, keys: &[&str]) -> Option<T> {
    match field(value, keys)? {
        Value::Number(n) => n.as_i64().map(T::from),
        Value::String(s) => s.trim().parse::<i64>().ok().map(T::from),
        _ => None,
    }
}

/// Timestamp from RFC 3339, `YYYY-MM-DD HH:MM:SS` (treated as UTC) or a
/// bare date.
pub fn datetime(value: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    let raw = field(value, keys)?.as_str()?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Decode a string that itself holds JSON (`"[...]"`, `"{...}"`, `"\"...\""`).
///
/// Returns `None` for anything that does not look like encoded JSON or fails
/// to parse.
#[must_use]
pub fn decode_embedded_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    let looks_encoded = matches!(trimmed.chars().next(), Some('[' | '{' | '"'));
    if !looks_encoded {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Items of a list payload: a bare array, or the first array found under
/// `keys` (searched one level of nesting deep, e.g. `{"cart": {"items": []}}`).
pub fn list<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(object) => {
            if let Some(Value::Array(items)) = field(value, keys) {
                return items;
            }
            object
                .values()
                .filter(|nested| nested.is_object())
                .find_map(|nested| match field(nested, keys) {
                    Some(Value::Array(items)) => Some(items.as_slice()),
                    _ => None,
                })
                .unwrap_or(&[])
        }
        _ => &[],
    }
}

/// URL-safe slug from a display name.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
