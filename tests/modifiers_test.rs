//! Integration tests for optional, nullable and default wrappers.

use inquest::{codes, Schema, SchemaLike};
use serde_json::json;

#[test]
fn test_optional_then_default_substitutes_on_unset() {
    let schema = Schema::number().optional().default(5);

    assert_eq!(schema.parse_input(None).unwrap(), Some(5.0));
    assert_eq!(schema.parse(&json!(null)).unwrap(), Some(5.0));
    assert_eq!(schema.parse(&json!(2)).unwrap(), Some(2.0));
}

#[test]
fn test_default_then_optional_substitutes_on_unset() {
    let schema = Schema::number().default(5).optional();

    assert_eq!(schema.parse_input(None).unwrap(), Some(5.0));
    assert_eq!(schema.parse(&json!(2)).unwrap(), Some(2.0));
}

#[test]
fn test_both_orders_inside_an_object() {
    let schema = Schema::object()
        .field("a", Schema::number().optional().default(5))
        .field("b", Schema::number().default(5).optional())
        .field("c", Schema::number().optional());

    let out = schema.parse(&json!({})).unwrap();
    assert_eq!(out.get("a"), Some(&json!(5)));
    assert_eq!(out.get("b"), Some(&json!(5)));
    assert!(!out.contains_key("c"));
}

#[test]
fn test_default_is_validated() {
    let schema = Schema::string().min_len(3).default("ab");
    let errors = schema.parse_input(None).unwrap_err();
    assert!(errors.first().has_code(codes::TOO_SMALL));
}

#[test]
fn test_nullable_vs_optional() {
    let nullable = Schema::object().field("n", Schema::integer().nullable());
    let out = nullable.parse(&json!({"n": null})).unwrap();
    assert_eq!(out.get("n"), Some(&json!(null)));
    assert!(nullable
        .parse(&json!({}))
        .unwrap_err()
        .first()
        .has_code(codes::REQUIRED));

    let optional = Schema::object().field("n", Schema::integer().optional());
    assert!(optional.parse(&json!({})).is_ok());
    assert!(optional
        .parse(&json!({"n": null}))
        .unwrap_err()
        .first()
        .has_code(codes::INVALID_TYPE));
}

#[test]
fn test_optional_nullable_accepts_both() {
    let schema = Schema::object().field("n", Schema::integer().nullable().optional());
    assert!(schema.parse(&json!({})).unwrap().get("n").is_none());
    assert_eq!(schema.parse(&json!({"n": null})).unwrap()["n"], json!(null));
    assert_eq!(schema.parse(&json!({"n": 1})).unwrap()["n"], json!(1));
}

#[test]
fn test_nullable_with_default_substitutes_null() {
    let schema = Schema::string().default("anon").nullable();
    assert_eq!(schema.parse(&json!(null)).unwrap(), Some("anon".to_string()));
}

#[test]
fn test_wrapper_errors_keep_field_path() {
    let schema = Schema::object().field("tags", Schema::array(Schema::string()).optional());
    let errors = schema.parse(&json!({"tags": ["a", 1]})).unwrap_err();
    assert_eq!(errors.first().path.to_string(), "tags[1]");
    assert_eq!(errors.len(), 1);
}
