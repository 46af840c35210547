//! Integration tests for the refinement pipeline.

use inquest::{codes, Issue, JsonPath, RefineParams, Schema, SchemaLike};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_refine_default_and_custom_errors() {
    let schema = Schema::integer()
        .refine(|n| *n > 0, RefineParams::new())
        .refine(|n| n % 2 == 0, RefineParams::new().message("must be even").code("even"));

    let errors = schema.parse(&json!(-3)).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.first().message, "custom validation failed");
    assert!(errors.first().has_code(codes::CUSTOM_VALIDATION));
    assert_eq!(errors.get(1).unwrap().message, "must be even");
    assert!(errors.get(1).unwrap().has_code("even"));
}

#[test]
fn test_immediate_refinement_stops_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let schema = Schema::integer()
        .refine(|_| false, RefineParams::from("first").immediate())
        .refine(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            },
            "second",
        );

    let errors = schema.parse(&json!(1)).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().message, "first");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_refinements_skipped_when_base_fails() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let schema = Schema::string().min_len(3).refine(
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        },
        "unused",
    );

    assert!(schema.parse(&json!("ab")).is_err());
    assert!(schema.parse(&json!(1)).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(schema.parse(&json!("abc")).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_super_refine_reports_many_issues() {
    let schema = Schema::object()
        .field("start", Schema::integer())
        .field("end", Schema::integer())
        .super_refine(|range, ctx| {
            let start = range["start"].as_i64().unwrap_or_default();
            let end = range["end"].as_i64().unwrap_or_default();
            if end < start {
                ctx.add_issue(
                    Issue::new("end must not precede start")
                        .with_code("range")
                        .with_expected(format!(">= {}", start))
                        .with_received(end)
                        .with_path(JsonPath::from_field("end")),
                );
            }
            if end - start > 10 {
                ctx.add_issue(Issue::new("range too wide").with_code("width"));
            }
        });

    let errors = schema.parse(&json!({"start": 5, "end": 1})).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "end");
    assert_eq!(errors.first().received, Some(json!(1)));

    let errors = schema.parse(&json!({"start": 0, "end": 50})).unwrap_err();
    assert!(errors.first().path.is_root());
    assert!(errors.first().has_code("width"));

    assert!(schema.parse(&json!({"start": 0, "end": 5})).is_ok());
}

#[test]
fn test_fatal_issue_stops_chain() {
    let schema = Schema::string()
        .super_refine(|_, ctx| ctx.add_issue(Issue::new("stop here").fatal()))
        .refine(|_| false, "not reached");

    let errors = schema.parse(&json!("x")).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().message, "stop here");
}

#[test]
fn test_nested_refinement_paths_are_absolute() {
    let schema = Schema::object().field(
        "users",
        Schema::array(
            Schema::object()
                .field("password", Schema::string())
                .field("confirm", Schema::string())
                .refine(
                    |u| u.get("password") == u.get("confirm"),
                    RefineParams::new()
                        .message("passwords do not match")
                        .path(JsonPath::from_field("confirm")),
                ),
        ),
    );

    let errors = schema
        .parse(&json!({"users": [
            {"password": "a", "confirm": "a"},
            {"password": "a", "confirm": "b"}
        ]}))
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "users[1].confirm");
}

#[test]
fn test_super_refine_sees_root() {
    let schema = Schema::object()
        .field("limit", Schema::integer())
        .field(
            "items",
            Schema::array(Schema::integer()).super_refine(|items, ctx| {
                let limit = ctx
                    .root()
                    .and_then(|root| root["limit"].as_u64())
                    .unwrap_or(u64::MAX);
                if items.len() as u64 > limit {
                    ctx.add_issue(Issue::new("too many items").with_code(codes::TOO_BIG));
                }
            }),
        );

    assert!(schema.parse(&json!({"limit": 3, "items": [1, 2]})).is_ok());
    let errors = schema.parse(&json!({"limit": 1, "items": [1, 2]})).unwrap_err();
    assert_eq!(errors.first().path.to_string(), "items");
}
