//! Record schema validation.
//!
//! A record is an object used as a dictionary: arbitrary keys, one schema for
//! every value and an optional schema for the keys themselves.

use indexmap::IndexMap;
use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::refine::Extensions;
use super::string::StringSchema;
use super::traits::{required_error, type_error, SchemaLike, ValueValidator};

/// A schema for string-keyed dictionaries.
///
/// Keys default to "any non-empty string". Key errors and value errors of the
/// same entry are both reported, at the entry's path.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let scores = Schema::record(Schema::integer().non_negative())
///     .key_schema(Schema::string().pattern(r"^[a-z]+$").unwrap());
///
/// assert!(scores.parse(&json!({"alice": 3, "bob": 0})).is_ok());
///
/// let errors = scores.parse(&json!({"Carol": -1})).unwrap_err();
/// assert_eq!(errors.len(), 2);
/// assert!(errors.iter().all(|e| e.path.to_string() == "Carol"));
/// ```
pub struct RecordSchema<S: SchemaLike> {
    value_schema: S,
    key_schema: Box<dyn ValueValidator>,
    type_error_message: Option<String>,
    extensions: Extensions<IndexMap<String, S::Output>>,
}

impl<S: SchemaLike> RecordSchema<S> {
    /// Creates a record whose values must pass `value_schema`.
    pub fn new(value_schema: S) -> Self {
        Self {
            value_schema,
            key_schema: Box::new(StringSchema::new().min_len(1)),
            type_error_message: None,
            extensions: Extensions::new(),
        }
    }

    /// Replaces the key schema.
    ///
    /// Keys are validated as JSON strings; a key schema that produces a string
    /// renames the entry in the output.
    pub fn key_schema<K>(mut self, schema: K) -> Self
    where
        K: SchemaLike + 'static,
    {
        self.key_schema = Box::new(schema);
        self
    }

    /// Sets the message used when the value is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    /// Runs the key schema at the entry's path, against the same root input.
    fn validate_key<'a>(
        &self,
        key: &str,
        ctx: &mut ValidationContext<'a>,
    ) -> ValidationResult<String> {
        let key_value = Value::String(key.to_string());
        let mut key_ctx = ValidationContext::at(ctx.root(), ctx.path().push_field(key));
        let result = self
            .key_schema
            .safe_parse_value(Some(&key_value), &mut key_ctx)
            .map(|validated| match validated {
                Some(Value::String(renamed)) => renamed,
                _ => key.to_string(),
            });
        ctx.absorb(key_ctx);
        result
    }
}

impl<S: SchemaLike> SchemaLike for RecordSchema<S> {
    type Output = IndexMap<String, S::Output>;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<IndexMap<String, S::Output>> {
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
        let mut validated = IndexMap::with_capacity(obj.len());

        for (key, entry) in obj {
            let key_result = self.validate_key(key, ctx);

            let mut child = ctx.child(key.as_str());
            let value_result = self.value_schema.safe_parse_in(Some(entry), &mut child);
            ctx.absorb(child);

            match (key_result, value_result) {
                (Validation::Success(k), Validation::Success(v)) => {
                    validated.insert(k, v);
                }
                (k, v) => {
                    if let Validation::Failure(e) = k {
                        errors.extend(e);
                    }
                    if let Validation::Failure(e) = v {
                        errors.extend(e);
                    }
                }
            }
        }

        match SchemaErrors::try_from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(validated),
        }
    }

    fn to_value(&self, output: IndexMap<String, S::Output>) -> Option<Value> {
        Some(Value::Object(
            output
                .into_iter()
                .filter_map(|(k, v)| self.value_schema.to_value(v).map(|v| (k, v)))
                .collect(),
        ))
    }

    fn extensions(&self) -> &Extensions<IndexMap<String, S::Output>> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<IndexMap<String, S::Output>> {
        &mut self.extensions
    }
}

impl<S: SchemaLike> ToJsonSchema for RecordSchema<S> {
    fn to_json_schema(&self) -> Value {
        json!({
            "type": "object",
            "additionalProperties": self.value_schema.describe(),
            "propertyNames": self.key_schema.descriptor(),
        })
    }
}
