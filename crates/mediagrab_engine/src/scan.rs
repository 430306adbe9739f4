//! Tolerant extraction helpers for undocumented third-party payloads.
//!
//! The endpoint schemas are unowned and drift without notice, so adapters
//! probe a fixed set of observed field spellings instead of deserializing a
//! strict shape.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

pub(crate) static IMAGE_EXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp)$").expect("pattern compiles"));

/// First non-empty string among the alternate spellings of one concept.
pub(crate) fn first_string<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
}

/// First `"key":"value"` occurrence in a page's inline JSON state.
pub(crate) fn json_string_field(html: &str, key: &str) -> Option<String> {
    // The key set is tiny and fixed per adapter; compiling here keeps the
    // call sites free of per-key statics.
    let pattern = Regex::new(&format!(r#""{key}":"([^"]+)""#)).ok()?;
    pattern
        .captures(html)
        .map(|captures| captures[1].to_string())
}

/// Looser `key: "value"` / `key = "value"` scan for non-JSON inline state.
pub(crate) fn loose_key_value(html: &str, key: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r#"{key}["']?\s*[:=]\s*["']([^"']+)["']"#)).ok()?;
    pattern
        .captures(html)
        .map(|captures| captures[1].to_string())
}

/// Undoes the escaping found in inline JSON blobs: `\u0026` for `&` and
/// `\/` for `/`.
pub(crate) fn unescape_embedded_url(raw: &str) -> String {
    raw.replace("\\u0026", "&").replace("\\/", "/")
}
