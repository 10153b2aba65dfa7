//! Text and JSON serialization helpers.
//!
//! JSON is always written with 2-space indentation and a trailing newline.
//! With serde_json's `preserve_order` feature, objects keep the key order they
//! were read with, so untouched keys round-trip verbatim.

use crate::core::ConfigError;
use serde_json::{Map, Value};
use std::path::Path;

/// A JSON object whose keys keep their insertion order.
pub type JsonObject = Map<String, Value>;

/// Writes a text file atomically.
pub async fn write_text_file(path: &Path, content: &str) -> Result<(), ConfigError> {
    super::atomic::safe_write(path, content).await
}

/// Parses `content` as a JSON document whose root must be an object.
///
/// A blank document parses as an empty object.
pub fn parse_json_object(path: &Path, content: &str) -> Result<JsonObject, ConfigError> {
    if content.trim().is_empty() {
        return Ok(JsonObject::new());
    }

    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigError::parse(path, "expected a JSON object at the top level")),
        Err(e) => Err(ConfigError::parse(path, e)),
    }
}

/// Serializes a value the way every document in this crate is written.
pub fn to_pretty_json(value: &impl serde::Serialize) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
