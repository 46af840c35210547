//! # Inquest
//!
//! A validation engine that walks untyped JSON input against a tree of
//! composable schemas and reports ALL validation errors, each qualified by the
//! path of the offending value, rather than stopping at the first failure.
//!
//! ## Overview
//!
//! Schemas are built fluently and are immutable once built, so one schema can
//! validate any number of inputs, from any number of threads. Failures are
//! values: `safe_parse` returns stillwater's `Validation`, and `parse` returns
//! a `Result` whose error is the aggregate [`SchemaErrors`].
//!
//! ## Core Types
//!
//! - [`Schema`]: Entry point for creating validation schemas
//! - [`SchemaLike`]: The contract every schema implements (`parse`, `safe_parse`, `refine`, ...)
//! - [`JsonPath`]: Represents paths to values in nested structures (e.g., `users[0].email`)
//! - [`SchemaError`]: A single validation error with context (path, message, code, expected/received)
//! - [`SchemaErrors`]: A non-empty collection of validation errors
//! - [`ValidationContext`]: Per-call state (path, root value, failed dependencies)
//!
//! ## Example
//!
//! ```rust
//! use inquest::{Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("a", Schema::object().field("b", Schema::array(Schema::integer())));
//!
//! let errors = schema.parse(&json!({"a": {"b": [1, "two", 3]}})).unwrap_err();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.first().path.to_string(), "a.b[1]");
//!
//! println!("{}", errors);
//! ```

pub mod batch;
pub mod error;
pub mod interop;
pub mod path;
pub mod registry;
pub mod schema;
pub mod validation;

pub use error::{codes, SchemaError, SchemaErrors};
pub use interop::ToJsonSchema;
pub use path::{JsonPath, PathSegment};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{
    AnySchema, ArraySchema, BooleanSchema, Condition, DefaultSchema, DependencyCondition,
    DependsOnSchema, Extensions, Format, IntegerSchema, Issue, NullableSchema, NumberSchema,
    ObjectSchema, OptionalSchema, RecordSchema, RefineParams, RefinementCtx, Schema, SchemaLike,
    StringSchema, UnknownProperties, ValueValidator,
};
pub use validation::{FailedDependency, ValidationContext, ValidationResultExt};

/// Type alias for validation results using SchemaErrors
pub type ValidationResult<T> = stillwater::Validation<T, SchemaErrors>;
