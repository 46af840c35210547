//! JSON Schema descriptors.
//!
//! Every schema can describe itself as a JSON Schema (draft 2020-12) document.
//! Composite schemas build their descriptor recursively from their children.

use serde_json::{Map, Value};

/// Trait for converting schema types to JSON Schema format.
///
/// Implementers of this trait can be exported as JSON Schema documents
/// compatible with draft 2020-12.
pub trait ToJsonSchema {
    /// Converts this schema to a JSON Schema representation.
    fn to_json_schema(&self) -> Value;
}

/// Maps string format presets to JSON Schema format strings.
pub fn format_to_json_schema_format(format_name: &str) -> &str {
    match format_name {
        "Email" => "email",
        "Url" => "uri",
        "Uuid" => "uuid",
        _ => "string",
    }
}

/// Merges `extra` entries into an object descriptor.
///
/// Non-object descriptors are wrapped in `allOf` so nothing is lost.
pub(crate) fn merge_into(descriptor: Value, extra: &Map<String, Value>) -> Value {
    if extra.is_empty() {
        return descriptor;
    }
    match descriptor {
        Value::Object(mut map) => {
            for (key, value) in extra {
                map.insert(key.clone(), value.clone());
            }
            Value::Object(map)
        }
        other => {
            let mut map = extra.clone();
            map.insert("allOf".to_string(), Value::Array(vec![other]));
            Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_mapping() {
        assert_eq!(format_to_json_schema_format("Email"), "email");
        assert_eq!(format_to_json_schema_format("Url"), "uri");
        assert_eq!(format_to_json_schema_format("Other"), "string");
    }

    #[test]
    fn test_merge_into_object() {
        let mut extra = Map::new();
        extra.insert("title".to_string(), json!("Name"));

        let merged = merge_into(json!({"type": "string"}), &extra);
        assert_eq!(merged, json!({"type": "string", "title": "Name"}));
    }

    #[test]
    fn test_merge_into_non_object() {
        let mut extra = Map::new();
        extra.insert("title".to_string(), json!("Anything"));

        let merged = merge_into(json!(true), &extra);
        assert_eq!(merged, json!({"title": "Anything", "allOf": [true]}));
    }
}
