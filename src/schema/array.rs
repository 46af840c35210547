//! Array schema validation.
//!
//! This module provides [`ArraySchema`] for validating arrays with an item
//! schema and length constraints.

use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::{codes, SchemaError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::refine::Extensions;
use super::traits::{required_error, type_error, SchemaLike};

/// A constraint applied to array values.
enum ArrayConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
}

/// A schema for validating array values.
///
/// `ArraySchema` validates that values are arrays, validates every item against
/// an item schema and applies length bounds. Length errors and item errors are
/// reported together; item errors come in ascending index order.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::array(Schema::string().min_len(1))
///     .non_empty()
///     .max_len(10);
///
/// assert!(schema.parse(&json!(["hello", "world"])).is_ok());
///
/// let errors = schema.parse(&json!(["ok", "", 3])).unwrap_err();
/// let paths: Vec<_> = errors.iter().map(|e| e.path.to_string()).collect();
/// assert_eq!(paths, vec!["[1]", "[2]"]);
/// ```
pub struct ArraySchema<S: SchemaLike> {
    item_schema: S,
    constraints: Vec<ArrayConstraint>,
    type_error_message: Option<String>,
    extensions: Extensions<Vec<S::Output>>,
}

impl<S: SchemaLike> ArraySchema<S> {
    /// Creates a new array schema with the given item schema.
    pub fn new(item_schema: S) -> Self {
        Self {
            item_schema,
            constraints: Vec::new(),
            type_error_message: None,
            extensions: Extensions::new(),
        }
    }

    /// Adds a minimum length constraint.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MinLength { min, message: None });
        self
    }

    /// Adds a maximum length constraint.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MaxLength { max, message: None });
        self
    }

    /// Requires at least one item.
    ///
    /// This is equivalent to `.min_len(1)`.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error message
    /// (used when the value is not an array).
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::array(Schema::string())
    ///     .min_len(1)
    ///     .error("at least one tag is required");
    ///
    /// let errors = schema.parse(&json!([])).unwrap_err();
    /// assert_eq!(errors.first().message, "at least one tag is required");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                ArrayConstraint::MinLength { message: m, .. }
                | ArrayConstraint::MaxLength { message: m, .. } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    /// Returns the item schema.
    pub fn item_schema(&self) -> &S {
        &self.item_schema
    }
}

impl<S: SchemaLike> SchemaLike for ArraySchema<S> {
    type Output = Vec<S::Output>;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Vec<S::Output>> {
        let Some(value) = value else {
            return Validation::Failure(required_error(ctx, "array"));
        };
        let Some(arr) = value.as_array() else {
            return Validation::Failure(type_error(
                ctx,
                "array",
                value,
                self.type_error_message.as_ref(),
            ));
        };

        let mut errors: Vec<SchemaError> = self
            .constraints
            .iter()
            .filter_map(|c| check_length(c, arr.len(), ctx))
            .collect();

        let mut validated_items = Vec::with_capacity(arr.len());
        for (index, item) in arr.iter().enumerate() {
            let mut child = ctx.child(index);
            let result = self.item_schema.safe_parse_in(Some(item), &mut child);
            ctx.absorb(child);
            match result {
                Validation::Success(v) => validated_items.push(v),
                Validation::Failure(e) => errors.extend(e),
            }
        }

        match SchemaErrors::try_from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(validated_items),
        }
    }

    fn to_value(&self, output: Vec<S::Output>) -> Option<Value> {
        Some(Value::Array(
            output
                .into_iter()
                .map(|item| self.item_schema.to_value(item).unwrap_or(Value::Null))
                .collect(),
        ))
    }

    fn extensions(&self) -> &Extensions<Vec<S::Output>> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<Vec<S::Output>> {
        &mut self.extensions
    }
}

fn check_length(
    constraint: &ArrayConstraint,
    len: usize,
    ctx: &ValidationContext<'_>,
) -> Option<SchemaError> {
    match constraint {
        ArrayConstraint::MinLength { min, message } if len < *min => {
            let msg = message.clone().unwrap_or_else(|| {
                format!("array must have at least {} items, got {}", min, len)
            });
            Some(
                SchemaError::new(ctx.path().clone(), msg)
                    .with_code(codes::TOO_SMALL)
                    .with_expected(format!("at least {} items", min))
                    .with_received(format!("{} items", len)),
            )
        }
        ArrayConstraint::MaxLength { max, message } if len > *max => {
            let msg = message.clone().unwrap_or_else(|| {
                format!("array must have at most {} items, got {}", max, len)
            });
            Some(
                SchemaError::new(ctx.path().clone(), msg)
                    .with_code(codes::TOO_BIG)
                    .with_expected(format!("at most {} items", max))
                    .with_received(format!("{} items", len)),
            )
        }
        _ => None,
    }
}

impl<S: SchemaLike> ToJsonSchema for ArraySchema<S> {
    fn to_json_schema(&self) -> Value {
        let mut schema = json!({
            "type": "array",
            "items": self.item_schema.describe(),
        });
        for constraint in &self.constraints {
            match constraint {
                ArrayConstraint::MinLength { min, .. } => schema["minItems"] = json!(min),
                ArrayConstraint::MaxLength { max, .. } => schema["maxItems"] = json!(max),
            }
        }
        schema
    }
}
