//! Object schema validation.
//!
//! This module provides [`ObjectSchema`] for validating JSON objects against a
//! fixed shape of named fields, plus the policy for properties outside that shape.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use stillwater::Validation;

use crate::error::{codes, SchemaError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::refine::Extensions;
use super::traits::{required_error, type_error, SchemaLike, ValueValidator};

/// How to handle properties not declared in the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownProperties {
    /// Ignore them; they never reach the output.
    #[default]
    Strip,
    /// Report one `unexpected_property` error per unknown key.
    Reject,
}

/// A schema for validating JSON objects.
///
/// Every declared field is validated in declaration order in its own child
/// context, and all field errors are accumulated. The output contains only
/// declared fields whose schema produced a value.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::integer().positive())
///     .field("email", Schema::string().email().optional())
///     .strict();
///
/// let user = schema.parse(&json!({"name": "Alice", "age": 30})).unwrap();
/// assert_eq!(user.get("name"), Some(&json!("Alice")));
/// assert!(user.get("email").is_none());
///
/// let errors = schema.parse(&json!({"name": "Alice", "age": 30, "admin": true})).unwrap_err();
/// assert_eq!(errors.first().code.as_deref(), Some("unexpected_property"));
/// ```
pub struct ObjectSchema {
    fields: IndexMap<String, Box<dyn ValueValidator>>,
    unknown_properties: UnknownProperties,
    type_error_message: Option<String>,
    extensions: Extensions<Map<String, Value>>,
}

impl ObjectSchema {
    /// Creates a new object schema with no fields.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            unknown_properties: UnknownProperties::default(),
            type_error_message: None,
            extensions: Extensions::new(),
        }
    }

    /// Declares a field.
    ///
    /// The field's schema decides whether it may be absent: plain schemas report
    /// `required`, while `.optional()`, `.default(..)` or `.depends_on(..)`
    /// wrappers admit a missing property. Declaring the same name twice
    /// replaces the earlier schema but keeps its position.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(name.into(), Box::new(schema));
        self
    }

    /// Sets the policy for properties outside the declared shape.
    pub fn unknown_properties(mut self, policy: UnknownProperties) -> Self {
        self.unknown_properties = policy;
        self
    }

    /// Shorthand for rejecting unknown properties.
    pub fn strict(self) -> Self {
        self.unknown_properties(UnknownProperties::Reject)
    }

    /// `true` strips unknown properties, `false` rejects them.
    pub fn additional_properties(self, allow: bool) -> Self {
        self.unknown_properties(if allow {
            UnknownProperties::Strip
        } else {
            UnknownProperties::Reject
        })
    }

    /// Sets a custom error message for type errors.
    ///
    /// This message is used when the input value is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    /// Returns the declared field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for ObjectSchema {
    type Output = Map<String, Value>;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Map<String, Value>> {
        let Some(value) = value else {
            return Validation::Failure(required_error(ctx, "object"));
        };
        let Some(obj) = value.as_object() else {
            return Validation::Failure(type_error(
                ctx,
                "object",
                value,
                self.type_error_message.as_ref(),
            ));
        };

        let mut errors: Vec<SchemaError> = Vec::new();
        let mut validated = Map::new();

        for (name, schema) in &self.fields {
            let mut child = ctx.child(name.as_str());
            let result = schema.safe_parse_value(obj.get(name), &mut child);
            ctx.absorb(child);
            match result {
                Validation::Success(Some(v)) => {
                    validated.insert(name.clone(), v);
                }
                Validation::Success(None) => {}
                Validation::Failure(e) => errors.extend(e),
            }
        }

        if self.unknown_properties == UnknownProperties::Reject {
            for key in obj.keys().filter(|k| !self.fields.contains_key(*k)) {
                errors.push(
                    SchemaError::new(
                        ctx.path().push_field(key.as_str()),
                        format!("unexpected property '{}'", key),
                    )
                    .with_code(codes::UNEXPECTED_PROPERTY),
                );
            }
        }

        match SchemaErrors::try_from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(validated),
        }
    }

    fn to_value(&self, output: Map<String, Value>) -> Option<Value> {
        Some(Value::Object(output))
    }

    fn extensions(&self) -> &Extensions<Map<String, Value>> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<Map<String, Value>> {
        &mut self.extensions
    }
}

impl ToJsonSchema for ObjectSchema {
    fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, schema)| (name.clone(), schema.descriptor()))
            .collect();
        let required: Vec<&String> = self
            .fields
            .iter()
            .filter(|(_, schema)| !schema.is_optional())
            .map(|(name, _)| name)
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        if self.unknown_properties == UnknownProperties::Reject {
            schema["additionalProperties"] = json!(false);
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::JsonPath;
    use crate::schema::{DependencyCondition, IntegerSchema, StringSchema};
    use serde_json::json;

    fn errors_of(schema: &ObjectSchema, input: Value) -> SchemaErrors {
        match schema.safe_parse(&input) {
            Validation::Failure(errors) => errors,
            Validation::Success(out) => panic!("expected failure, got {:?}", out),
        }
    }

    #[test]
    fn test_every_non_object_kind_is_a_type_error() {
        let schema = ObjectSchema::new();
        for input in [json!("s"), json!(1), json!(null), json!([]), json!(true)] {
            let errors = errors_of(&schema, input);
            assert!(errors.first().has_code(codes::INVALID_TYPE));
            assert_eq!(errors.first().expected, Some(json!("object")));
        }
        assert!(schema.safe_parse_input(None).is_failure());
    }

    #[test]
    fn test_missing_field_reports_undefined() {
        let errors = errors_of(&ObjectSchema::new().field("id", IntegerSchema::new()), json!({}));
        assert_eq!(errors.first().path, JsonPath::from_field("id"));
        assert_eq!(errors.first().received, Some(json!("undefined")));
    }

    #[test]
    fn test_rejected_keys_follow_field_errors_in_input_order() {
        let schema = ObjectSchema::new()
            .field("id", IntegerSchema::new())
            .unknown_properties(UnknownProperties::Reject);

        let errors = errors_of(&schema, json!({"zeta": 1, "id": "x", "alpha": 2}));
        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["id", "zeta", "alpha"]);
        assert_eq!(errors.get(1).unwrap().message, "unexpected property 'zeta'");
    }

    #[test]
    fn test_error_overrides_type_message() {
        let errors = errors_of(&ObjectSchema::new().error("expected a user"), json!(7));
        assert_eq!(errors.first().message, "expected a user");
    }

    #[test]
    fn test_object_refinement_waits_for_fields() {
        let schema = ObjectSchema::new()
            .field("n", IntegerSchema::new())
            .refine(|_| false, "unreachable");

        let errors = errors_of(&schema, json!({"n": 1.5}));
        assert_eq!(errors.len(), 1);
        assert!(errors.first().has_code(codes::INVALID_TYPE));
    }

    #[test]
    fn test_failed_dependencies_reach_caller_context() {
        let schema = ObjectSchema::new()
            .field("mode", StringSchema::new())
            .field(
                "target",
                StringSchema::new()
                    .depends_on([DependencyCondition::pattern("mode", "^manual$").unwrap()]),
            );

        let input = json!({"mode": "auto"});
        let mut ctx = ValidationContext::new(Some(&input));
        assert!(schema.safe_parse_in(Some(&input), &mut ctx).is_success());
        assert_eq!(ctx.failed_dependencies().len(), 1);
        assert_eq!(ctx.failed_dependencies()[0].actual.as_deref(), Some("auto"));
    }

    #[test]
    fn test_descriptor_lists_required_fields() {
        let schema = ObjectSchema::new()
            .field("id", IntegerSchema::new())
            .field("note", StringSchema::new().optional())
            .additional_properties(false);

        assert_eq!(
            schema.to_json_schema(),
            json!({
                "type": "object",
                "properties": {"id": {"type": "integer"}, "note": {"type": "string"}},
                "required": ["id"],
                "additionalProperties": false
            })
        );
    }
}
