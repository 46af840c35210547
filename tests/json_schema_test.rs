//! Integration tests for JSON Schema descriptors.

use inquest::{DependencyCondition, Schema, SchemaLike, ToJsonSchema};
use serde_json::json;

#[test]
fn test_leaf_descriptors() {
    assert_eq!(
        Schema::string().min_len(1).max_len(10).describe(),
        json!({"type": "string", "minLength": 1, "maxLength": 10})
    );
    assert_eq!(
        Schema::string().email().describe(),
        json!({"type": "string", "format": "email"})
    );
    assert_eq!(
        Schema::string().url().describe(),
        json!({"type": "string", "format": "uri"})
    );
    assert_eq!(
        Schema::integer().min(0).max(9).describe(),
        json!({"type": "integer", "minimum": 0, "maximum": 9})
    );
    assert_eq!(Schema::boolean().describe(), json!({"type": "boolean"}));
    assert_eq!(Schema::any().describe(), json!({}));
}

#[test]
fn test_nested_descriptor() {
    let schema = Schema::object()
        .field("id", Schema::integer().positive())
        .field("tags", Schema::array(Schema::string()).max_len(5).optional())
        .field("labels", Schema::record(Schema::string()).nullable())
        .strict();

    assert_eq!(
        schema.describe(),
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer", "exclusiveMinimum": 0},
                "tags": {"type": "array", "items": {"type": "string"}, "maxItems": 5},
                "labels": {"oneOf": [
                    {"type": "null"},
                    {
                        "type": "object",
                        "additionalProperties": {"type": "string"},
                        "propertyNames": {"type": "string", "minLength": 1}
                    }
                ]}
            },
            "required": ["id", "labels"],
            "additionalProperties": false
        })
    );
}

#[test]
fn test_metadata_is_merged() {
    let schema = Schema::string()
        .metadata("title", "Display name")
        .metadata("examples", json!(["Ada"]));

    let descriptor = schema.describe();
    assert_eq!(descriptor["title"], "Display name");
    assert_eq!(descriptor["examples"], json!(["Ada"]));
    assert_eq!(descriptor["type"], "string");

    // to_json_schema is the bare descriptor
    assert!(schema.to_json_schema().get("title").is_none());
}

#[test]
fn test_metadata_on_field_appears_in_parent() {
    let schema = Schema::object().field(
        "age",
        Schema::integer().metadata("description", "age in years"),
    );
    assert_eq!(
        schema.describe()["properties"]["age"]["description"],
        "age in years"
    );
}

#[test]
fn test_default_and_dependency_annotations() {
    let schema = Schema::object()
        .field("mode", Schema::string().default("auto"))
        .field(
            "target",
            Schema::string().depends_on([DependencyCondition::pattern("mode", "^manual$").unwrap()]),
        );

    let descriptor = schema.describe();
    assert_eq!(descriptor["properties"]["mode"]["default"], "auto");
    assert_eq!(
        descriptor["properties"]["target"]["x-depends-on"],
        json!([{"field": "mode", "condition": "^manual$"}])
    );
    assert!(descriptor.get("required").is_none());
}

#[test]
fn test_refinements_do_not_change_descriptor() {
    let plain = Schema::integer().describe();
    let refined = Schema::integer().refine(|n| *n != 13, "unlucky").describe();
    assert_eq!(plain, refined);
}
