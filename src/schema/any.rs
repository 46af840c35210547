//! Schema accepting any present value.

use serde_json::{json, Value};
use stillwater::Validation;

use crate::interop::ToJsonSchema;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::refine::Extensions;
use super::traits::{required_error, SchemaLike};

/// A schema that accepts every set value, null included.
///
/// Useful as a record value or object field whose content is checked only by
/// refinements.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::any();
/// assert_eq!(schema.parse(&json!([1, "a"])).unwrap(), json!([1, "a"]));
/// assert!(schema.parse_input(None).is_err());
/// ```
pub struct AnySchema {
    extensions: Extensions<Value>,
}

impl AnySchema {
    /// Creates a new schema accepting any value.
    pub fn new() -> Self {
        Self {
            extensions: Extensions::new(),
        }
    }
}

impl Default for AnySchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for AnySchema {
    type Output = Value;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Value> {
        match value {
            Some(value) => Validation::Success(value.clone()),
            None => Validation::Failure(required_error(ctx, "any")),
        }
    }

    fn to_value(&self, output: Value) -> Option<Value> {
        Some(output)
    }

    fn extensions(&self) -> &Extensions<Value> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<Value> {
        &mut self.extensions
    }
}

impl ToJsonSchema for AnySchema {
    fn to_json_schema(&self) -> Value {
        json!({})
    }
}
