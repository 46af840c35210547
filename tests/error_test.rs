//! Integration tests for error formatting and aggregation.

use inquest::{
    codes, JsonPath, Schema, SchemaError, SchemaErrors, SchemaLike, ValidationResultExt,
};
use serde_json::json;
use stillwater::prelude::*;

#[test]
fn test_error_display_includes_context() {
    let error = SchemaError::new(JsonPath::from_field("age"), "expected integer, got string")
        .with_code(codes::INVALID_TYPE)
        .with_expected("integer")
        .with_received("string");

    assert_eq!(
        error.to_string(),
        "age: expected integer, got string [invalid_type] (expected: integer) (received: string)"
    );
}

#[test]
fn test_root_error_display() {
    let error = SchemaError::new(JsonPath::root(), "oops");
    assert_eq!(error.to_string(), "(root): oops");
}

#[test]
fn test_summary_lists_errors_in_order() {
    let schema = Schema::object()
        .field("name", Schema::string())
        .field("age", Schema::integer());
    let errors = schema.parse(&json!({"name": 1, "age": "x"})).unwrap_err();

    let summary = errors.summary();
    let mut lines = summary.lines();
    assert_eq!(lines.next(), Some("Validation failed with 2 error(s):"));
    assert!(lines.next().unwrap().starts_with("  1. name:"));
    assert!(lines.next().unwrap().starts_with("  2. age:"));
    assert_eq!(summary, errors.to_string());
}

#[test]
fn test_errors_are_std_errors() {
    let errors = Schema::boolean().parse(&json!(1)).unwrap_err();
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(errors);
    assert!(boxed.to_string().contains("(root)"));
}

#[test]
fn test_combine_preserves_order() {
    let a = SchemaErrors::single(SchemaError::new(JsonPath::from_field("a"), "first"));
    let b = SchemaErrors::from_vec(vec![
        SchemaError::new(JsonPath::from_field("b"), "second"),
        SchemaError::new(JsonPath::from_field("c"), "third"),
    ]);

    let combined = a.combine(b);
    let messages: Vec<&str> = combined.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
}

#[test]
fn test_query_helpers() {
    let schema = Schema::object()
        .field("a", Schema::string().min_len(5))
        .field("b", Schema::string().min_len(5))
        .field("c", Schema::integer());
    let errors = schema
        .parse(&json!({"a": "x", "b": "y", "c": true}))
        .unwrap_err();

    assert_eq!(errors.with_code(codes::TOO_SMALL).len(), 2);
    assert_eq!(errors.at_path(&JsonPath::from_field("c")).len(), 1);
    assert!(errors.get(3).is_none());
    assert_eq!(errors.into_vec().len(), 3);
}

#[test]
fn test_try_from_vec_rejects_empty() {
    assert!(SchemaErrors::try_from_vec(Vec::new()).is_none());
}

#[test]
fn test_result_ext_helpers() {
    let ok = Schema::integer().safe_parse(&json!(3));
    assert_eq!(ok.output(), Some(&3));
    assert!(ok.schema_errors().is_none());

    let failed = Schema::integer()
        .safe_parse(&json!("3"))
        .map_errors(&JsonPath::from_field("count").push_index(2));
    assert_eq!(failed.schema_errors().unwrap().first().path.to_string(), "count[2]");
    assert!(failed.output().is_none());
}

#[test]
fn test_prefixed_leaves_original_untouched() {
    let original = SchemaErrors::single(SchemaError::new(JsonPath::from_field("x"), "bad"));
    let moved = original.prefixed(&JsonPath::from_field("outer"));
    assert_eq!(original.first().path.to_string(), "x");
    assert_eq!(moved.first().path.to_string(), "outer.x");
}

#[test]
fn test_errors_export_as_json() {
    let schema = Schema::object().field("a", Schema::object().field("b", Schema::array(Schema::string())));
    let errors = schema.parse(&json!({"a": {"b": ["ok", 5]}})).unwrap_err();

    let exported = errors.to_value();
    assert_eq!(exported[0]["path"], json!(["a", "b", 1]));
    assert_eq!(exported[0]["code"], json!(codes::INVALID_TYPE));
    assert_eq!(exported[0]["received"], json!("number"));
}
