//! Boolean schema validation.

use serde_json::{json, Value};
use stillwater::Validation;

use crate::interop::ToJsonSchema;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::refine::Extensions;
use super::traits::{required_error, type_error, SchemaLike};

/// A schema accepting `true` and `false`.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::boolean();
/// assert_eq!(schema.parse(&json!(true)).unwrap(), true);
/// assert!(schema.parse(&json!("true")).is_err());
/// ```
pub struct BooleanSchema {
    type_error_message: Option<String>,
    extensions: Extensions<bool>,
}

impl BooleanSchema {
    /// Creates a new boolean schema.
    pub fn new() -> Self {
        Self {
            type_error_message: None,
            extensions: Extensions::new(),
        }
    }

    /// Sets the message used when the value is not a boolean.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for BooleanSchema {
    type Output = bool;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<bool> {
        match value {
            None => Validation::Failure(required_error(ctx, "boolean")),
            Some(Value::Bool(b)) => Validation::Success(*b),
            Some(other) => Validation::Failure(type_error(
                ctx,
                "boolean",
                other,
                self.type_error_message.as_ref(),
            )),
        }
    }

    fn to_value(&self, output: bool) -> Option<Value> {
        Some(Value::Bool(output))
    }

    fn extensions(&self) -> &Extensions<bool> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<bool> {
        &mut self.extensions
    }
}

impl ToJsonSchema for BooleanSchema {
    fn to_json_schema(&self) -> Value {
        json!({ "type": "boolean" })
    }
}
