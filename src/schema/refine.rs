//! Post-validation refinements.
//!
//! Every schema owns an [`Extensions`] block holding its ordered refinement
//! list and descriptor metadata. Refinements run only after the schema's base
//! validation succeeded, in the order they were chained.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{codes, SchemaError};
use crate::path::JsonPath;
use crate::validation::ValidationContext;

type CheckFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type SuperCheckFn<T> = Box<dyn Fn(&T, &mut RefinementCtx<'_>) + Send + Sync>;

/// A single post-validation check.
enum Refinement<T> {
    /// Boolean predicate with one configured error.
    Check { check: CheckFn<T>, params: RefineParams },
    /// Callback that may report any number of issues.
    Super { check: SuperCheckFn<T> },
}

/// Error configuration for a `refine` check.
///
/// `&str` and `String` convert into params carrying that message, so the
/// common case reads `.refine(|n| n % 2 == 0, "must be even")`.
///
/// # Example
///
/// ```rust
/// use inquest::{RefineParams, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::integer()
///     .refine(|n| *n != 13, RefineParams::new().message("unlucky").code("unlucky").immediate())
///     .refine(|n| n % 2 == 0, "must be even");
///
/// let errors = schema.parse(&json!(13)).unwrap_err();
/// assert_eq!(errors.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RefineParams {
    message: String,
    code: String,
    path: Option<JsonPath>,
    immediate: bool,
}

impl RefineParams {
    /// Creates params with the generic message and the `custom_validation` code.
    pub fn new() -> Self {
        Self {
            message: "custom validation failed".to_string(),
            code: codes::CUSTOM_VALIDATION.to_string(),
            path: None,
            immediate: false,
        }
    }

    /// Sets the error message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the error code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Reports the error at `path`, relative to the refined value.
    pub fn path(mut self, path: JsonPath) -> Self {
        self.path = Some(path);
        self
    }

    /// Stops the remaining refinements of this schema when the check fails.
    pub fn immediate(mut self) -> Self {
        self.immediate = true;
        self
    }
}

impl Default for RefineParams {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for RefineParams {
    fn from(message: &str) -> Self {
        Self::new().message(message)
    }
}

impl From<String> for RefineParams {
    fn from(message: String) -> Self {
        Self::new().message(message)
    }
}

/// An issue reported from a `super_refine` callback.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    message: String,
    code: Option<String>,
    expected: Option<Value>,
    received: Option<Value>,
    path: Option<JsonPath>,
    fatal: bool,
}

impl Issue {
    /// Creates an issue with the given message and no code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            expected: None,
            received: None,
            path: None,
            fatal: false,
        }
    }

    /// Sets the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the expected payload.
    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Sets the received payload.
    pub fn with_received(mut self, received: impl Into<Value>) -> Self {
        self.received = Some(received.into());
        self
    }

    /// Reports the issue at `path`, relative to the refined value.
    pub fn with_path(mut self, path: JsonPath) -> Self {
        self.path = Some(path);
        self
    }

    /// Stops the remaining refinements of this schema after this issue.
    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }
}

/// Handle given to `super_refine` callbacks for reporting issues.
pub struct RefinementCtx<'r> {
    path: JsonPath,
    root: Option<&'r Value>,
    errors: Vec<SchemaError>,
    aborted: bool,
}

impl<'r> RefinementCtx<'r> {
    fn new(path: JsonPath, root: Option<&'r Value>) -> Self {
        Self {
            path,
            root,
            errors: Vec::new(),
            aborted: false,
        }
    }

    /// Path of the value being refined.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Root input of the current top-level call.
    pub fn root(&self) -> Option<&'r Value> {
        self.root
    }

    /// Reports an issue.
    pub fn add_issue(&mut self, issue: Issue) {
        let path = match &issue.path {
            Some(relative) => self.path.join(relative),
            None => self.path.clone(),
        };
        let mut error = SchemaError::new(path, issue.message);
        error.code = issue.code;
        error.expected = issue.expected;
        error.received = issue.received;
        self.errors.push(error);
        self.aborted |= issue.fatal;
    }

    /// Number of issues reported so far.
    pub fn issue_count(&self) -> usize {
        self.errors.len()
    }
}

/// Refinements and descriptor metadata attached to a schema.
pub struct Extensions<T> {
    refinements: Vec<Refinement<T>>,
    metadata: Map<String, Value>,
}

impl<T> Extensions<T> {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self {
            refinements: Vec::new(),
            metadata: Map::new(),
        }
    }

    pub(crate) fn push_check<F>(&mut self, check: F, params: RefineParams)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.refinements.push(Refinement::Check {
            check: Box::new(check),
            params,
        });
    }

    pub(crate) fn push_super<F>(&mut self, check: F)
    where
        F: Fn(&T, &mut RefinementCtx<'_>) + Send + Sync + 'static,
    {
        self.refinements.push(Refinement::Super {
            check: Box::new(check),
        });
    }

    pub(crate) fn insert_metadata(&mut self, key: String, value: Value) {
        self.metadata.insert(key, value);
    }

    /// Number of chained refinements.
    pub fn len(&self) -> usize {
        self.refinements.len()
    }

    /// Returns true when no refinement is chained.
    pub fn is_empty(&self) -> bool {
        self.refinements.is_empty()
    }

    /// Metadata entries merged into the schema descriptor.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Runs the refinements against a validated value, reporting into `ctx`.
    pub(crate) fn apply(&self, output: &T, ctx: &mut ValidationContext<'_>) {
        for refinement in &self.refinements {
            match refinement {
                Refinement::Check { check, params } => {
                    if check(output) {
                        continue;
                    }
                    let path = match &params.path {
                        Some(relative) => ctx.path().join(relative),
                        None => ctx.path().clone(),
                    };
                    ctx.report(
                        SchemaError::new(path, params.message.clone()).with_code(params.code.clone()),
                    );
                    if params.immediate {
                        trace!(path = %ctx.path(), "immediate refinement failed, skipping the rest");
                        break;
                    }
                }
                Refinement::Super { check } => {
                    let mut refinement_ctx = RefinementCtx::new(ctx.path().clone(), ctx.root());
                    check(output, &mut refinement_ctx);
                    let aborted = refinement_ctx.aborted;
                    ctx.report_all(refinement_ctx.errors);
                    if aborted {
                        trace!(path = %ctx.path(), "fatal issue reported, skipping the rest");
                        break;
                    }
                }
            }
        }
    }
}

impl<T> Default for Extensions<T> {
    fn default() -> Self {
        Self::new()
    }
}
