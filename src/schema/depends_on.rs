//! Conditionally required fields.
//!
//! A [`DependsOnSchema`] only applies when at least one of its
//! [`DependencyCondition`]s holds for a sibling field. Sibling values are
//! turned into text before matching:
//!
//! | sibling | text |
//! |---|---|
//! | string | the string itself |
//! | boolean | `"true"` / `"false"` |
//! | number | decimal form as written by `serde_json` (`1`, `2.5`) |
//! | null | `"null"` |
//! | array / object | compact JSON |
//!
//! An unset sibling never satisfies a condition.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{json, Map, Value};
use stillwater::Validation;
use tracing::debug;

use crate::error::{codes, SchemaError, SchemaErrors};
use crate::interop::json_schema::merge_into;
use crate::interop::ToJsonSchema;
use crate::validation::{FailedDependency, ValidationContext};
use crate::ValidationResult;

use super::refine::Extensions;
use super::traits::SchemaLike;

/// Test applied to the text of a sibling value.
#[derive(Clone)]
pub enum Condition {
    /// Holds when the regex finds a match.
    Pattern(Regex),
    /// Holds when the predicate returns true.
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Condition {
    /// Evaluates the condition against a sibling's text.
    pub fn holds(&self, actual: &str) -> bool {
        match self {
            Condition::Pattern(regex) => regex.is_match(actual),
            Condition::Predicate(predicate) => predicate(actual),
        }
    }

    /// Pattern source, or `<predicate>` for closures.
    pub fn describe(&self) -> String {
        match self {
            Condition::Pattern(regex) => regex.as_str().to_string(),
            Condition::Predicate(_) => "<predicate>".to_string(),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Condition::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

/// A sibling field name paired with the condition its value must satisfy.
#[derive(Clone, Debug)]
pub struct DependencyCondition {
    field: String,
    condition: Condition,
}

impl DependencyCondition {
    /// Holds when the sibling's text matches `pattern`.
    ///
    /// Returns an error if the pattern is not a valid regex.
    pub fn pattern(field: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::matching(field, Regex::new(pattern)?))
    }

    /// Holds when the sibling's text matches a compiled regex.
    pub fn matching(field: impl Into<String>, regex: Regex) -> Self {
        Self {
            field: field.into(),
            condition: Condition::Pattern(regex),
        }
    }

    /// Holds when `predicate` accepts the sibling's text.
    pub fn when<F>(field: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            field: field.into(),
            condition: Condition::Predicate(Arc::new(predicate)),
        }
    }

    /// Sibling field the condition reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The test applied to the sibling.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

/// Renders a sibling value as the text conditions are matched against.
pub(crate) fn condition_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_empty_input(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Applies the inner schema only when a sibling condition holds.
///
/// When no condition holds the field is not applicable: validation succeeds
/// with no value and the conditions are recorded on the context as
/// [`FailedDependency`] entries. When any condition holds, unset, null, `""`
/// and `[]` are reported as `required`; other input goes to the inner schema.
/// An inner schema with a default still fills in unset and null input.
/// An empty condition list never holds.
///
/// # Example
///
/// ```rust
/// use inquest::{DependencyCondition, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("flag", Schema::boolean())
///     .field(
///         "value",
///         Schema::string().depends_on([DependencyCondition::pattern("flag", "true").unwrap()]),
///     );
///
/// let out = schema.parse(&json!({"flag": false})).unwrap();
/// assert!(!out.contains_key("value"));
///
/// let errors = schema.parse(&json!({"flag": true})).unwrap_err();
/// assert_eq!(errors.first().path.to_string(), "value");
/// assert_eq!(errors.first().code.as_deref(), Some("required"));
///
/// assert!(schema.parse(&json!({"flag": true, "value": "x"})).is_ok());
/// ```
pub struct DependsOnSchema<S: SchemaLike> {
    inner: S,
    conditions: Vec<DependencyCondition>,
    extensions: Extensions<Option<S::Output>>,
}

impl<S: SchemaLike> DependsOnSchema<S> {
    pub(crate) fn new(inner: S, conditions: impl IntoIterator<Item = DependencyCondition>) -> Self {
        Self {
            inner,
            conditions: conditions.into_iter().collect(),
            extensions: Extensions::new(),
        }
    }

    /// Returns the wrapped schema.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the conditions, any one of which makes the field mandatory.
    pub fn conditions(&self) -> &[DependencyCondition] {
        &self.conditions
    }

    fn applies(&self, ctx: &mut ValidationContext<'_>) -> bool {
        let mut failed = Vec::new();
        for dependency in &self.conditions {
            let actual = ctx.sibling(&dependency.field).map(condition_text);
            let holds = actual
                .as_deref()
                .is_some_and(|text| dependency.condition.holds(text));
            if holds {
                return true;
            }
            failed.push(FailedDependency {
                path: ctx.path().clone(),
                field: dependency.field.clone(),
                condition: dependency.condition.describe(),
                actual,
            });
        }

        debug!(path = %ctx.path(), conditions = failed.len(), "dependent field not applicable");
        for dependency in failed {
            ctx.record_failed_dependency(dependency);
        }
        false
    }
}

impl<S: SchemaLike> SchemaLike for DependsOnSchema<S> {
    type Output = Option<S::Output>;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<Option<S::Output>> {
        if !self.applies(ctx) {
            return Validation::Success(None);
        }
        let defaulted = self.inner.has_default() && matches!(value, None | Some(Value::Null));
        if is_empty_input(value) && !defaulted {
            let received = value.cloned().unwrap_or_else(|| Value::from("undefined"));
            return Validation::Failure(SchemaErrors::single(
                SchemaError::new(ctx.path().clone(), "required")
                    .with_code(codes::REQUIRED)
                    .with_expected("non-empty value")
                    .with_received(received),
            ));
        }

        let mut inner_ctx = ctx.fork();
        let result = self.inner.safe_parse_in(value, &mut inner_ctx);
        ctx.absorb(inner_ctx);
        result.map(Some)
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

impl<S: SchemaLike> ToJsonSchema for DependsOnSchema<S> {
    fn to_json_schema(&self) -> Value {
        let conditions: Vec<Value> = self
            .conditions
            .iter()
            .map(|d| json!({ "field": d.field, "condition": d.condition.describe() }))
            .collect();
        let mut extra = Map::new();
        extra.insert("x-depends-on".to_string(), Value::Array(conditions));
        merge_into(self.inner.describe(), &extra)
    }
}
