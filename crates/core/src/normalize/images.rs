//! Image list normalization.
//!
//! Depending on the endpoint and the age of the row, product images arrive
//! as null, a bare URL, a JSON-encoded string (`"[\"/a.jpg\"]"` or
//! `"\"/a.jpg\""`), an array of strings, an array of objects with a `url`
//! key, or a single such object. [`parse_images`] flattens all of these into
//! a list of URL strings.

use serde_json::Value;
use url::Url;

use super::value::{decode_embedded_json, field};

/// Object keys that may hold an image URL, in priority order.
const URL_KEYS: &[&str] = &["url", "image_url", "src", "path", "image"];

/// Maximum nesting followed when strings contain encoded JSON.
const MAX_DEPTH: usize = 4;

/// Flatten any supported image payload into non-empty, non-placeholder URL
/// strings, keeping the first occurrence of duplicates.
///
/// Never fails: malformed JSON is treated as a literal URL and anything else
/// unrecognised is dropped.
#[must_use]
pub fn parse_images(value: &Value) -> Vec<String> {
    let mut urls = Vec::new();
    collect(value, 0, &mut urls);

    let mut unique: Vec<String> = Vec::with_capacity(urls.len());
    for url in urls {
        if !unique.contains(&url) {
            unique.push(url);
        }
    }
    unique
}

fn collect(value: &Value, depth: usize, out: &mut Vec<String>) {
    if depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::String(raw) => collect_string(raw, depth, out),
        Value::Array(items) => {
            for item in items {
                collect(item, depth + 1, out);
            }
        }
        Value::Object(_) => {
            if let Some(inner) = field(value, URL_KEYS) {
                collect(inner, depth + 1, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn collect_string(raw: &str, depth: usize, out: &mut Vec<String>) {
    let trimmed = raw.trim();
    if let Some(decoded) = decode_embedded_json(trimmed) {
        collect(&decoded, depth + 1, out);
        return;
    }
    if is_usable(trimmed) {
        out.push(trimmed.to_string());
    }
}

/// Whether a candidate string is worth keeping as an image URL.
fn is_usable(candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    let lower = candidate.to_ascii_lowercase();
    if matches!(lower.as_str(), "null" | "undefined" | "[]" | "{}" | "\"\"") {
        return false;
    }
    !lower.contains("placeholder")
}

/// Turn a relative upload path into an absolute URL against `base`.
///
/// Absolute `http(s)` and `data:` URLs pass through untouched; protocol-relative
/// URLs take the scheme of `base`. If joining fails the input is returned.
#[must_use]
pub fn resolve_image_url(base: &Url, raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("//") {
        return format!("{}://{rest}", base.scheme());
    }
    if let Ok(absolute) = Url::parse(trimmed) {
        return absolute.to_string();
    }
    base.join(trimmed)
        .map_or_else(|_| trimmed.to_string(), |joined| joined.to_string())
}
