//! Traits for schema polymorphism.
//!
//! This module provides the [`SchemaLike`] contract every schema implements and
//! the type-erased [`ValueValidator`] used wherever heterogeneous schemas are
//! stored together (object fields, record keys, the registry).

use serde_json::Value;
use stillwater::Validation;
use tracing::debug;

use crate::error::{codes, SchemaError, SchemaErrors};
use crate::interop::json_schema::merge_into;
use crate::interop::ToJsonSchema;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::depends_on::{DependencyCondition, DependsOnSchema};
use super::modifiers::{DefaultSchema, NullableSchema, OptionalSchema};
use super::refine::{Extensions, RefineParams, RefinementCtx};

/// A trait for schema types that can validate JSON values.
///
/// Implementors provide the base check ([`SchemaLike::validate`]) and access to
/// their refinement list; everything else (`parse`, `safe_parse`, refinement
/// chaining, modifier wrapping) is provided on top of those.
///
/// An unset input is passed as `None`; an explicit null is `Some(&Value::Null)`.
///
/// The `Send + Sync` bounds allow built schemas to be shared across threads.
/// Builder methods take `self` by value, so a schema cannot be reconfigured
/// while another thread validates with it.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("tags", Schema::array(Schema::string()));
///
/// let errors = schema.parse(&json!({"name": "", "tags": ["a", 1]})).unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub trait SchemaLike: ToJsonSchema + Send + Sync {
    /// The output type produced by successful validation.
    type Output;

    /// Runs the base check for this schema.
    ///
    /// Ordinary invalid input is reported as `Validation::Failure`, never as a
    /// panic. Composite implementations recurse into children through
    /// [`SchemaLike::safe_parse_in`] with child contexts.
    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Self::Output>;

    /// Converts validated output into a JSON value; `None` means "no value".
    fn to_value(&self, output: Self::Output) -> Option<Value>;

    /// Returns the refinements and metadata attached to this schema.
    fn extensions(&self) -> &Extensions<Self::Output>;

    /// Returns the refinements and metadata for modification.
    fn extensions_mut(&mut self) -> &mut Extensions<Self::Output>;

    /// Returns true if this schema substitutes a value for unset input.
    fn has_default(&self) -> bool {
        false
    }

    /// Returns true if unset input can pass this schema.
    ///
    /// Object descriptors leave such fields out of their `required` list.
    fn accepts_unset(&self) -> bool {
        false
    }

    /// Validates `value` and runs the refinement pipeline within `ctx`.
    ///
    /// Refinements run only when the base check succeeded. The result is a
    /// failure whenever `ctx` gained errors during this call.
    fn safe_parse_in(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Self::Output> {
        let mark = ctx.error_count();
        match self.validate(value, ctx) {
            Validation::Failure(errors) => {
                ctx.report_all(errors.iter().cloned());
                Validation::Failure(ctx.errors_since(mark).unwrap_or(errors))
            }
            Validation::Success(output) => {
                self.extensions().apply(&output, ctx);
                match ctx.errors_since(mark) {
                    Some(errors) => Validation::Failure(errors),
                    None => Validation::Success(output),
                }
            }
        }
    }

    /// Validates a present value in a fresh context.
    fn safe_parse(&self, value: &Value) -> ValidationResult<Self::Output> {
        self.safe_parse_input(Some(value))
    }

    /// Validates a possibly unset value in a fresh context.
    fn safe_parse_input(&self, value: Option<&Value>) -> ValidationResult<Self::Output> {
        let mut ctx = ValidationContext::new(value);
        self.safe_parse_in(value, &mut ctx)
    }

    /// Validates a present value, returning the aggregate error on failure.
    fn parse(&self, value: &Value) -> Result<Self::Output, SchemaErrors> {
        self.parse_input(Some(value))
    }

    /// Validates a possibly unset value, returning the aggregate error on failure.
    fn parse_input(&self, value: Option<&Value>) -> Result<Self::Output, SchemaErrors> {
        let mut ctx = ValidationContext::new(value);
        match self.safe_parse_in(value, &mut ctx) {
            Validation::Success(output) => Ok(output),
            Validation::Failure(errors) => {
                let errors = ctx.into_error().unwrap_or(errors);
                debug!(errors = errors.len(), "validation failed");
                Err(errors)
            }
        }
    }

    /// Appends a boolean refinement.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let even = Schema::integer().refine(|n| n % 2 == 0, "must be even");
    /// assert!(even.parse(&json!(4)).is_ok());
    /// assert!(even.parse(&json!(5)).is_err());
    /// ```
    fn refine<F>(mut self, check: F, params: impl Into<RefineParams>) -> Self
    where
        Self: Sized,
        F: Fn(&Self::Output) -> bool + Send + Sync + 'static,
    {
        self.extensions_mut().push_check(check, params.into());
        self
    }

    /// Appends a refinement that may report any number of issues.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Issue, JsonPath, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object()
    ///     .field("password", Schema::string())
    ///     .field("confirm", Schema::string())
    ///     .super_refine(|obj, ctx| {
    ///         if obj.get("password") != obj.get("confirm") {
    ///             ctx.add_issue(
    ///                 Issue::new("passwords do not match")
    ///                     .with_code("mismatch")
    ///                     .with_path(JsonPath::from_field("confirm")),
    ///             );
    ///         }
    ///     });
    ///
    /// let errors = schema.parse(&json!({"password": "a", "confirm": "b"})).unwrap_err();
    /// assert_eq!(errors.first().path.to_string(), "confirm");
    /// ```
    fn super_refine<F>(mut self, check: F) -> Self
    where
        Self: Sized,
        F: Fn(&Self::Output, &mut RefinementCtx<'_>) + Send + Sync + 'static,
    {
        self.extensions_mut().push_super(check);
        self
    }

    /// Attaches a metadata entry to this schema's descriptor.
    fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self
    where
        Self: Sized,
    {
        self.extensions_mut()
            .insert_metadata(key.into(), value.into());
        self
    }

    /// Returns the descriptor document, with metadata merged in.
    fn describe(&self) -> Value {
        merge_into(self.to_json_schema(), self.extensions().metadata())
    }

    /// Wraps this schema so that unset input is accepted.
    fn optional(self) -> OptionalSchema<Self>
    where
        Self: Sized,
    {
        OptionalSchema::new(self)
    }

    /// Wraps this schema so that explicit null is accepted.
    fn nullable(self) -> NullableSchema<Self>
    where
        Self: Sized,
    {
        NullableSchema::new(self)
    }

    /// Wraps this schema so that unset or null input is replaced by `value`.
    ///
    /// The substituted value is still validated by this schema.
    fn default(self, value: impl Into<Value>) -> DefaultSchema<Self>
    where
        Self: Sized,
    {
        DefaultSchema::new(self, value.into())
    }

    /// Wraps this schema so that it only applies when a sibling condition holds.
    fn depends_on(
        self,
        conditions: impl IntoIterator<Item = DependencyCondition>,
    ) -> DependsOnSchema<Self>
    where
        Self: Sized,
    {
        DependsOnSchema::new(self, conditions)
    }
}

/// A type-erased trait for schemas that validate to JSON values.
///
/// `ValueValidator` allows schemas with different output types to be stored
/// together. Any type that implements `SchemaLike` automatically implements it.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, ValueValidator};
///
/// let validators: Vec<Box<dyn ValueValidator>> = vec![
///     Box::new(Schema::string().min_len(1)),
///     Box::new(Schema::integer().positive()),
/// ];
/// assert_eq!(validators.len(), 2);
/// ```
pub trait ValueValidator: Send + Sync {
    /// Runs the full pipeline and converts the output into a JSON value.
    ///
    /// `Success(None)` means the schema accepted the input but contributes no value.
    fn safe_parse_value(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Option<Value>>;

    /// Returns the descriptor document of the schema.
    fn descriptor(&self) -> Value;

    /// Returns true if unset input can pass the schema.
    fn is_optional(&self) -> bool;
}

impl<S: SchemaLike> ValueValidator for S {
    fn safe_parse_value(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Option<Value>> {
        self.safe_parse_in(value, ctx).map(|output| self.to_value(output))
    }

    fn descriptor(&self) -> Value {
        self.describe()
    }

    fn is_optional(&self) -> bool {
        self.accepts_unset()
    }
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Builds the `required` error reported for unset input.
pub(crate) fn required_error(ctx: &ValidationContext<'_>, expected: &str) -> SchemaErrors {
    SchemaErrors::single(
        SchemaError::new(ctx.path().clone(), "required")
            .with_code(codes::REQUIRED)
            .with_expected(expected)
            .with_received("undefined"),
    )
}

/// Builds the `invalid_type` error for a present value of the wrong kind.
pub(crate) fn type_error(
    ctx: &ValidationContext<'_>,
    expected: &str,
    value: &Value,
    message: Option<&String>,
) -> SchemaErrors {
    let message = message
        .cloned()
        .unwrap_or_else(|| format!("expected {}", expected));
    SchemaErrors::single(
        SchemaError::new(ctx.path().clone(), message)
            .with_code(codes::INVALID_TYPE)
            .with_expected(expected)
            .with_received(value_type_name(value)),
    )
}
