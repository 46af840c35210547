//! Integration tests for conditionally required fields.

use inquest::{codes, DependencyCondition, ObjectSchema, Schema, SchemaLike, ValidationContext};
use serde_json::json;

fn flagged() -> ObjectSchema {
    Schema::object().field("flag", Schema::boolean()).field(
        "value",
        Schema::string().depends_on([DependencyCondition::pattern("flag", "true").unwrap()]),
    )
}

#[test]
fn test_condition_not_met_skips_field() {
    let input = json!({"flag": false});
    let mut ctx = ValidationContext::new(Some(&input));
    let result = flagged().safe_parse_in(Some(&input), &mut ctx);

    match result {
        stillwater::Validation::Success(out) => assert!(!out.contains_key("value")),
        stillwater::Validation::Failure(e) => panic!("unexpected failure: {}", e),
    }

    let failed = ctx.failed_dependencies();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].field, "flag");
    assert_eq!(failed[0].condition, "true");
    assert_eq!(failed[0].actual.as_deref(), Some("false"));
    assert_eq!(failed[0].path.to_string(), "value");
}

#[test]
fn test_condition_met_requires_value() {
    let errors = flagged().parse(&json!({"flag": true})).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "value");
    assert!(errors.first().has_code(codes::REQUIRED));
    assert_eq!(errors.first().received, Some(json!("undefined")));
}

#[test]
fn test_condition_met_with_value_passes() {
    let out = flagged().parse(&json!({"flag": true, "value": "x"})).unwrap();
    assert_eq!(out["value"], json!("x"));
}

#[test]
fn test_empty_values_count_as_missing() {
    for empty in [json!(null), json!(""), json!([])] {
        let errors = flagged()
            .parse(&json!({"flag": true, "value": empty}))
            .unwrap_err();
        assert!(errors.first().has_code(codes::REQUIRED));
        assert_eq!(errors.first().received, Some(empty));
    }
}

#[test]
fn test_inner_schema_still_applies() {
    let schema = Schema::object().field("kind", Schema::string()).field(
        "code",
        Schema::string()
            .min_len(3)
            .depends_on([DependencyCondition::pattern("kind", "^(a|b)$").unwrap()]),
    );

    let errors = schema.parse(&json!({"kind": "a", "code": "x"})).unwrap_err();
    assert!(errors.first().has_code(codes::TOO_SMALL));
    assert!(schema.parse(&json!({"kind": "c", "code": "x"})).is_ok());
}

#[test]
fn test_any_condition_suffices() {
    let schema = Schema::object()
        .field("a", Schema::any())
        .field("b", Schema::any())
        .field(
            "c",
            Schema::string().depends_on([
                DependencyCondition::pattern("a", "^yes$").unwrap(),
                DependencyCondition::when("b", |text| text.parse::<i64>().is_ok_and(|n| n > 10)),
            ]),
        );

    assert!(schema.parse(&json!({"a": "no", "b": 1})).is_ok());
    assert!(schema.parse(&json!({"a": "yes", "b": 1})).is_err());
    assert!(schema.parse(&json!({"a": "no", "b": 11})).is_err());
}

#[test]
fn test_conditions_see_non_string_siblings() {
    let schema = Schema::object()
        .field("count", Schema::integer())
        .field(
            "note",
            Schema::string().depends_on([DependencyCondition::pattern("count", "^0$").unwrap()]),
        );
    assert!(schema.parse(&json!({"count": 0})).is_err());
    assert!(schema.parse(&json!({"count": 3})).is_ok());
}

#[test]
fn test_unset_sibling_never_satisfies() {
    let schema = Schema::object()
        .field("flag", Schema::boolean().optional())
        .field(
            "value",
            Schema::string().depends_on([DependencyCondition::pattern("flag", ".*").unwrap()]),
        );

    let input = json!({});
    let mut ctx = ValidationContext::new(Some(&input));
    assert!(schema.safe_parse_in(Some(&input), &mut ctx).is_success());
    assert_eq!(ctx.failed_dependencies()[0].actual, None);
}

#[test]
fn test_invalid_pattern_is_reported() {
    assert!(DependencyCondition::pattern("flag", "(").is_err());
}

#[test]
fn test_nested_dependency_uses_local_siblings() {
    let schema = Schema::object().field(
        "items",
        Schema::array(
            Schema::object().field("flag", Schema::boolean()).field(
                "value",
                Schema::string().depends_on([DependencyCondition::pattern("flag", "true").unwrap()]),
            ),
        ),
    );

    let errors = schema
        .parse(&json!({"items": [{"flag": false}, {"flag": true}]}))
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "items[1].value");
}

#[test]
fn test_condition_met_uses_inner_default() {
    let schema = Schema::object().field("plan", Schema::string()).field(
        "seats",
        Schema::integer()
            .default(1)
            .depends_on([DependencyCondition::pattern("plan", "^team$").unwrap()]),
    );

    let out = schema.parse(&json!({"plan": "team"})).unwrap();
    assert_eq!(out["seats"], json!(1));

    let out = schema.parse(&json!({"plan": "team", "seats": 5})).unwrap();
    assert_eq!(out["seats"], json!(5));

    let out = schema.parse(&json!({"plan": "solo"})).unwrap();
    assert!(!out.contains_key("seats"));
}
