//! Specification table normalization.
//!
//! Older products store specifications as an object map
//! (`{"Socket": "AM5"}`), newer ones as an ordered array of
//! `{"key": "Socket", "value": "AM5"}` rows, and either form may arrive
//! JSON-encoded inside a string column.

use serde_json::Value;

use super::value::{decode_embedded_json, display_value, field};
use crate::types::Specification;

const KEY_FIELDS: &[&str] = &["key", "name", "label", "title"];
const VALUE_FIELDS: &[&str] = &["value", "val", "content", "detail"];

/// Always return the array form, whatever shape the source used.
///
/// Object maps come back in key order. Rows with a blank key are dropped;
/// values that are not strings are rendered as text.
#[must_use]
pub fn normalize_specifications(value: &Value) -> Vec<Specification> {
    match value {
        Value::Array(rows) => rows.iter().filter_map(row_to_spec).collect(),
        Value::Object(map) => {
            let mut specs: Vec<Specification> = map
                .iter()
                .filter(|(key, _)| !key.trim().is_empty())
                .map(|(key, value)| Specification::new(key.trim(), display_value(value)))
                .collect();
            specs.sort_by(|a, b| a.key.cmp(&b.key));
            specs
        }
        Value::String(raw) => match decode_embedded_json(raw) {
            Some(decoded @ (Value::Array(_) | Value::Object(_))) => {
                normalize_specifications(&decoded)
            }
            _ => Vec::new(),
        },
        Value::Null | Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}

fn row_to_spec(row: &Value) -> Option<Specification> {
    match row {
        Value::Object(_) => {
            let key = field(row, KEY_FIELDS).map(display_value)?;
            if key.is_empty() {
                return None;
            }
            let value = field(row, VALUE_FIELDS)
                .map(display_value)
                .unwrap_or_default();
            Some(Specification::new(key, value))
        }
        // `[["Socket", "AM5"], ...]`
        Value::Array(pair) => match pair.as_slice() {
            [key, value] => {
                let key = display_value(key);
                (!key.is_empty()).then(|| Specification::new(key, display_value(value)))
            }
            _ => None,
        },
        _ => None,
    }
}
