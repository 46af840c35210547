//! The error record produced by every failed check, and its non-empty aggregate.

use std::fmt::{self, Display};

use serde_json::{Map, Value};
use stillwater::prelude::*;

use crate::path::JsonPath;

/// One failed check, attributed to the value it concerns.
///
/// `path` is measured from the root input of the top-level call. `code` is
/// the machine-readable kind (see [`codes`](crate::codes)); `expected`,
/// `received` and `value` are optional diagnostics.
///
/// Errors are never edited once reported. Composites that need a different
/// path make a copy with [`SchemaError::prefixed`].
///
/// # Example
///
/// ```rust
/// use inquest::{codes, JsonPath, SchemaError};
/// use serde_json::json;
///
/// let error = SchemaError::new(JsonPath::from_field("port"), "must be at most 65535")
///     .with_code(codes::TOO_BIG)
///     .with_expected("<= 65535")
///     .with_received(70000);
///
/// assert_eq!(
///     error.to_string(),
///     "port: must be at most 65535 [too_big] (expected: <= 65535) (received: 70000)"
/// );
/// assert_eq!(error.to_value()["path"], json!(["port"]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Location of the offending value, from the root input.
    pub path: JsonPath,
    /// Human-readable description.
    pub message: String,
    /// Machine-readable kind, one of [`codes`](crate::codes) or a custom code.
    pub code: Option<String>,
    /// What the check wanted.
    pub expected: Option<Value>,
    /// What the check got, usually a type name or a size.
    pub received: Option<Value>,
    /// The offending input itself.
    pub value: Option<Value>,
}

impl SchemaError {
    /// An error with no code and no diagnostics.
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            code: None,
            expected: None,
            received: None,
            value: None,
        }
    }

    /// Sets the machine-readable code.
    pub fn with_code(self, code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..self
        }
    }

    /// Sets the expected-value diagnostic.
    pub fn with_expected(self, expected: impl Into<Value>) -> Self {
        Self {
            expected: Some(expected.into()),
            ..self
        }
    }

    /// Sets the received-value diagnostic.
    pub fn with_received(self, received: impl Into<Value>) -> Self {
        Self {
            received: Some(received.into()),
            ..self
        }
    }

    /// Attaches the offending input.
    pub fn with_value(self, value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..self
        }
    }

    /// Copy of this error re-parented under `prefix`.
    pub fn prefixed(&self, prefix: &JsonPath) -> Self {
        Self {
            path: self.path.prepend(prefix),
            ..self.clone()
        }
    }

    /// Returns true if the error carries `code`.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    /// The error as a JSON object: `path` and `message`, plus whichever of
    /// `code`, `expected`, `received` and `value` are set.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("path".to_string(), self.path.to_value());
        out.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(code) = &self.code {
            out.insert("code".to_string(), Value::String(code.clone()));
        }
        let optional = [
            ("expected", &self.expected),
            ("received", &self.received),
            ("value", &self.value),
        ];
        for (key, field) in optional {
            if let Some(v) = field {
                out.insert(key.to_string(), v.clone());
            }
        }
        Value::Object(out)
    }
}

/// Strings print bare; anything else prints as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            f.write_str("(root)")?;
        } else {
            write!(f, "{}", self.path)?;
        }
        write!(f, ": {}", self.message)?;

        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(expected) = &self.expected {
            write!(f, " (expected: {})", render(expected))?;
        }
        if let Some(received) = &self.received {
            write!(f, " (received: {})", render(received))?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Every error of one failed validation, in the order they were reported.
///
/// Built on stillwater's `NonEmptyVec`, so a failure can never be empty. The
/// multi-line summary is rendered from the list each time the aggregate is
/// formatted; nothing is cached.
///
/// Aggregates from independent validations merge with `Semigroup::combine`:
///
/// ```rust
/// use inquest::{JsonPath, SchemaError, SchemaErrors};
/// use stillwater::prelude::*;
///
/// let left = SchemaErrors::single(SchemaError::new(JsonPath::from_field("a"), "bad"));
/// let right = SchemaErrors::single(SchemaError::new(JsonPath::from_field("b"), "worse"));
///
/// let both = left.combine(right);
/// assert_eq!(both.len(), 2);
/// assert_eq!(
///     both.summary(),
///     "Validation failed with 2 error(s):\n  1. a: bad\n  2. b: worse\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// An aggregate holding one error.
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// `None` for an empty list.
    pub fn try_from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Builds an aggregate from a list known to be non-empty.
    ///
    /// # Panics
    ///
    /// Panics if `errors` is empty.
    pub fn from_vec(errors: Vec<SchemaError>) -> Self {
        Self::try_from_vec(errors).expect("SchemaErrors requires at least one error")
    }

    /// Number of errors; at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Errors in report order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// The error at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&SchemaError> {
        self.iter().nth(index)
    }

    /// The first error reported.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Errors located exactly at `path`.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&SchemaError> {
        self.iter().filter(|e| &e.path == path).collect()
    }

    /// Errors carrying `code`.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.iter().filter(|e| e.has_code(code)).collect()
    }

    /// Copy with every path re-parented under `prefix`.
    pub fn prefixed(&self, prefix: &JsonPath) -> Self {
        Self::from_vec(self.iter().map(|e| e.prefixed(prefix)).collect())
    }

    /// The text `Display` produces: a header line, then one numbered line per error.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// JSON array of [`SchemaError::to_value`] objects.
    pub fn to_value(&self) -> Value {
        Value::Array(self.iter().map(SchemaError::to_value).collect())
    }

    /// Unwraps into a plain list.
    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        self.iter()
            .enumerate()
            .try_for_each(|(i, error)| writeln!(f, "  {}. {}", i + 1, error))
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a SchemaErrors {
    type Item = &'a SchemaError;
    type IntoIter = Box<dyn Iterator<Item = &'a SchemaError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SchemaError>();
    assert_send_sync::<SchemaErrors>();
};
