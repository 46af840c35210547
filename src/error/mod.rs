//! Error types for validation failures.
//!
//! This module provides types for representing validation errors with rich context
//! including paths, messages, codes and expected/received values.

mod schema_error;

pub use schema_error::{SchemaError, SchemaErrors};

/// Error codes emitted by the built-in schemas.
pub mod codes {
    /// The value has the wrong base kind.
    pub const INVALID_TYPE: &str = "invalid_type";
    /// A size or range lower bound was violated.
    pub const TOO_SMALL: &str = "too_small";
    /// A size or range upper bound was violated.
    pub const TOO_BIG: &str = "too_big";
    /// A string did not match its pattern.
    pub const PATTERN: &str = "pattern";
    /// A mandatory value was missing.
    pub const REQUIRED: &str = "required";
    /// A `refine` check failed without a caller-chosen code.
    pub const CUSTOM_VALIDATION: &str = "custom_validation";
    /// An object carried a property its shape does not declare.
    pub const UNEXPECTED_PROPERTY: &str = "unexpected_property";
}
