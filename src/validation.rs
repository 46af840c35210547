//! Per-call validation state.
//!
//! This module provides the [`ValidationContext`] threaded through a validation
//! tree and the [`ValidationResultExt`] helpers used on [`ValidationResult`].
//!
//! A context belongs to exactly one top-level `parse`/`safe_parse` call. Composite
//! schemas derive a child context for each field, item or entry; children share
//! the root value but never the path, so sibling validations cannot observe each
//! other's state.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::{JsonPath, PathSegment};
use crate::ValidationResult;

/// A conditional-requirement check that did not hold.
///
/// Recorded for diagnostics only; it never changes the validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDependency {
    /// Path of the field carrying the condition.
    pub path: JsonPath,
    /// Sibling field the condition inspected.
    pub field: String,
    /// Textual form of the condition (pattern source or `<predicate>`).
    pub condition: String,
    /// Stringified sibling value, or `None` when the sibling was unset.
    pub actual: Option<String>,
}

/// Validation context carries the path, root value and accumulated errors.
///
/// The context is passed through the validation call chain to enable:
/// - Path tracking, so every error is attributed relative to the root input
/// - Cross-field lookups against the root value (see [`ValidationContext::sibling`])
/// - Error accumulation for refinements that report more than one problem
/// - Bookkeeping of conditional requirements that did not hold
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike, ValidationContext};
/// use serde_json::json;
///
/// let input = json!({"flag": true});
/// let mut ctx = ValidationContext::new(Some(&input));
///
/// let result = Schema::object()
///     .field("flag", Schema::boolean())
///     .safe_parse_in(Some(&input), &mut ctx);
///
/// assert!(result.is_success());
/// assert!(!ctx.has_errors());
/// ```
#[derive(Debug)]
pub struct ValidationContext<'a> {
    root: Option<&'a Value>,
    path: JsonPath,
    errors: Vec<SchemaError>,
    failed_dependencies: Vec<FailedDependency>,
}

impl<'a> ValidationContext<'a> {
    /// Creates a context rooted at `root` with an empty path.
    ///
    /// Pass `None` when the top-level input itself is unset.
    pub fn new(root: Option<&'a Value>) -> Self {
        Self::at(root, JsonPath::root())
    }

    /// Creates a context rooted at `root` whose current path is `path`.
    pub fn at(root: Option<&'a Value>, path: JsonPath) -> Self {
        Self {
            root,
            path,
            errors: Vec::new(),
            failed_dependencies: Vec::new(),
        }
    }

    /// Creates a child context for a field, item or entry.
    ///
    /// The child shares the root value, extends the path by `segment` and
    /// starts with empty error and dependency lists.
    pub fn child(&self, segment: impl Into<PathSegment>) -> ValidationContext<'a> {
        Self::at(self.root, self.path.push(segment))
    }

    /// Creates a context with the same root and path but fresh accumulators.
    ///
    /// Modifier wrappers use this before delegating to their inner schema.
    pub fn fork(&self) -> ValidationContext<'a> {
        Self::at(self.root, self.path.clone())
    }

    /// Takes over the dependency bookkeeping of a finished child context.
    ///
    /// Child errors are not copied; they travel back through the child's result.
    pub fn absorb(&mut self, child: ValidationContext<'a>) {
        self.failed_dependencies.extend(child.failed_dependencies);
    }

    /// Returns the current path.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Returns the root input value of the top-level call.
    pub fn root(&self) -> Option<&'a Value> {
        self.root
    }

    /// Looks up an arbitrary path in the root value.
    pub fn lookup(&self, path: &JsonPath) -> Option<&'a Value> {
        path.resolve(self.root?)
    }

    /// Looks up a sibling of the current value, i.e. `field` inside the parent container.
    ///
    /// At the root the lookup is performed against the root value itself.
    pub fn sibling(&self, field: &str) -> Option<&'a Value> {
        let parent = self.path.parent().unwrap_or_default();
        self.lookup(&parent.push_field(field))
    }

    /// Appends an error.
    pub fn report(&mut self, error: SchemaError) {
        self.errors.push(error);
    }

    /// Appends every error of a collection, preserving order.
    pub fn report_all(&mut self, errors: impl IntoIterator<Item = SchemaError>) {
        self.errors.extend(errors);
    }

    /// Returns the errors accumulated so far.
    pub fn errors(&self) -> &[SchemaError] {
        &self.errors
    }

    /// Returns the number of errors accumulated so far.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if any error has been accumulated.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Builds a failure from the errors accumulated since `mark`.
    ///
    /// Returns `None` when no error was added after `mark`.
    pub fn errors_since(&self, mark: usize) -> Option<SchemaErrors> {
        SchemaErrors::try_from_vec(self.errors.get(mark..).unwrap_or_default().to_vec())
    }

    /// Records a conditional requirement that did not hold.
    pub fn record_failed_dependency(&mut self, dependency: FailedDependency) {
        self.failed_dependencies.push(dependency);
    }

    /// Returns the conditional requirements that did not hold during this call.
    pub fn failed_dependencies(&self) -> &[FailedDependency] {
        &self.failed_dependencies
    }

    /// Converts the accumulated errors into the aggregate error, if there are any.
    pub fn into_error(self) -> Option<SchemaErrors> {
        SchemaErrors::try_from_vec(self.errors)
    }
}

/// Helpers for working with [`ValidationResult`] values.
///
/// # Example
///
/// ```rust
/// use inquest::{JsonPath, Schema, SchemaLike, ValidationResultExt};
/// use serde_json::json;
///
/// let result = Schema::string().safe_parse(&json!(5));
/// let moved = result.map_errors(&JsonPath::from_field("name"));
///
/// let errors = moved.into_schema_errors().unwrap();
/// assert_eq!(errors.first().path.to_string(), "name");
/// ```
pub trait ValidationResultExt<T> {
    /// Returns a new result whose errors have `prefix` prepended to their paths.
    ///
    /// Successful results are returned unchanged.
    fn map_errors(self, prefix: &JsonPath) -> ValidationResult<T>;

    /// Converts a failure into its aggregate error; `None` on success.
    fn into_schema_errors(self) -> Option<SchemaErrors>;

    /// Returns the errors of a failure.
    fn schema_errors(&self) -> Option<&SchemaErrors>;

    /// Returns the data of a success.
    fn output(&self) -> Option<&T>;
}

impl<T> ValidationResultExt<T> for ValidationResult<T> {
    fn map_errors(self, prefix: &JsonPath) -> ValidationResult<T> {
        match self {
            Validation::Success(data) => Validation::Success(data),
            Validation::Failure(errors) => Validation::Failure(errors.prefixed(prefix)),
        }
    }

    fn into_schema_errors(self) -> Option<SchemaErrors> {
        match self {
            Validation::Success(_) => None,
            Validation::Failure(errors) => Some(errors),
        }
    }

    fn schema_errors(&self) -> Option<&SchemaErrors> {
        match self {
            Validation::Success(_) => None,
            Validation::Failure(errors) => Some(errors),
        }
    }

    fn output(&self) -> Option<&T> {
        match self {
            Validation::Success(data) => Some(data),
            Validation::Failure(_) => None,
        }
    }
}
