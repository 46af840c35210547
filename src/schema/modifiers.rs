//! Modifier wrappers: optional, nullable and default.
//!
//! Each wrapper holds exactly one inner schema and decides, before delegating,
//! whether the input needs the inner schema at all. Wrappers nest in the order
//! they are chained; `a.optional().default(x)` is a `DefaultSchema` around an
//! `OptionalSchema`.

use serde_json::{json, Map, Value};
use stillwater::Validation;

use crate::interop::json_schema::merge_into;
use crate::interop::ToJsonSchema;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::refine::Extensions;
use super::traits::SchemaLike;

/// Runs the inner pipeline in a forked context and keeps its dependency records.
fn delegate<S: SchemaLike>(
    inner: &S,
    value: Option<&Value>,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<S::Output> {
    let mut inner_ctx = ctx.fork();
    let result = inner.safe_parse_in(value, &mut inner_ctx);
    ctx.absorb(inner_ctx);
    result
}

/// Accepts unset input without consulting the inner schema.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string().optional();
/// assert_eq!(schema.parse_input(None).unwrap(), None);
/// assert_eq!(schema.parse(&json!("x")).unwrap(), Some("x".to_string()));
/// assert!(schema.parse(&json!(null)).is_err());
/// ```
pub struct OptionalSchema<S: SchemaLike> {
    inner: S,
    extensions: Extensions<Option<S::Output>>,
}

impl<S: SchemaLike> OptionalSchema<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self {
            inner,
            extensions: Extensions::new(),
        }
    }

    /// Returns the wrapped schema.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SchemaLike> SchemaLike for OptionalSchema<S> {
    type Output = Option<S::Output>;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Option<S::Output>> {
        if value.is_none() && !self.inner.has_default() {
            return Validation::Success(None);
        }
        delegate(&self.inner, value, ctx).map(Some)
    }

    fn to_value(&self, output: Option<S::Output>) -> Option<Value> {
        output.and_then(|o| self.inner.to_value(o))
    }

    fn extensions(&self) -> &Extensions<Option<S::Output>> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<Option<S::Output>> {
        &mut self.extensions
    }

    fn has_default(&self) -> bool {
        self.inner.has_default()
    }

    fn accepts_unset(&self) -> bool {
        true
    }
}

impl<S: SchemaLike> ToJsonSchema for OptionalSchema<S> {
    fn to_json_schema(&self) -> Value {
        self.inner.describe()
    }
}

/// Accepts explicit null without consulting the inner schema.
///
/// Null input yields `None`, which is written back as JSON `null`.
pub struct NullableSchema<S: SchemaLike> {
    inner: S,
    extensions: Extensions<Option<S::Output>>,
}

impl<S: SchemaLike> NullableSchema<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self {
            inner,
            extensions: Extensions::new(),
        }
    }

    /// Returns the wrapped schema.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SchemaLike> SchemaLike for NullableSchema<S> {
    type Output = Option<S::Output>;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Option<S::Output>> {
        if matches!(value, Some(Value::Null)) && !self.inner.has_default() {
            return Validation::Success(None);
        }
        delegate(&self.inner, value, ctx).map(Some)
    }

    fn to_value(&self, output: Option<S::Output>) -> Option<Value> {
        match output {
            Some(o) => self.inner.to_value(o),
            None => Some(Value::Null),
        }
    }

    fn extensions(&self) -> &Extensions<Option<S::Output>> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<Option<S::Output>> {
        &mut self.extensions
    }

    fn has_default(&self) -> bool {
        self.inner.has_default()
    }

    fn accepts_unset(&self) -> bool {
        self.inner.accepts_unset()
    }
}

impl<S: SchemaLike> ToJsonSchema for NullableSchema<S> {
    fn to_json_schema(&self) -> Value {
        json!({ "oneOf": [{ "type": "null" }, self.inner.describe()] })
    }
}

/// Substitutes a configured value for unset or null input.
///
/// The substituted value runs through the inner schema's full pipeline, so a
/// default that breaks the inner constraints is reported like any other input.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::integer().min(1).default(10);
/// assert_eq!(schema.parse_input(None).unwrap(), 10);
/// assert_eq!(schema.parse(&json!(null)).unwrap(), 10);
/// assert_eq!(schema.parse(&json!(3)).unwrap(), 3);
///
/// let broken = Schema::integer().min(1).default(0);
/// assert!(broken.parse_input(None).is_err());
/// ```
pub struct DefaultSchema<S: SchemaLike> {
    inner: S,
    default: Value,
    extensions: Extensions<S::Output>,
}

impl<S: SchemaLike> DefaultSchema<S> {
    pub(crate) fn new(inner: S, default: Value) -> Self {
        Self {
            inner,
            default,
            extensions: Extensions::new(),
        }
    }

    /// Returns the wrapped schema.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the substituted value.
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

impl<S: SchemaLike> SchemaLike for DefaultSchema<S> {
    type Output = S::Output;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<S::Output> {
        let value = match value {
            None | Some(Value::Null) => &self.default,
            Some(v) => v,
        };
        delegate(&self.inner, Some(value), ctx)
    }

    fn to_value(&self, output: S::Output) -> Option<Value> {
        self.inner.to_value(output)
    }

    fn extensions(&self) -> &Extensions<S::Output> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<S::Output> {
        &mut self.extensions
    }

    fn has_default(&self) -> bool {
        true
    }

    fn accepts_unset(&self) -> bool {
        true
    }
}

impl<S: SchemaLike> ToJsonSchema for DefaultSchema<S> {
    fn to_json_schema(&self) -> Value {
        let mut extra = Map::new();
        extra.insert("default".to_string(), self.default.clone());
        merge_into(self.inner.describe(), &extra)
    }
}
