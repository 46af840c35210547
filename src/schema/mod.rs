//! Schema definitions for validation.
//!
//! This module provides schema types for validating data structures.
//! Each schema type (string, number, object, etc.) validates values and accumulates
//! all validation errors rather than short-circuiting on the first failure.
//!
//! # Example
//!
//! ```rust
//! use inquest::{Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! assert!(schema.safe_parse(&json!("hello")).is_success());
//! ```

mod any;
mod array;
mod boolean;
mod depends_on;
mod modifiers;
mod numeric;
mod object;
mod record;
mod refine;
mod string;
mod traits;

pub use any::AnySchema;
pub use array::ArraySchema;
pub use boolean::BooleanSchema;
pub use depends_on::{Condition, DependencyCondition, DependsOnSchema};
pub use modifiers::{DefaultSchema, NullableSchema, OptionalSchema};
pub use numeric::{IntegerSchema, NumberSchema};
pub use object::{ObjectSchema, UnknownProperties};
pub use record::RecordSchema;
pub use refine::{Extensions, Issue, RefineParams, RefinementCtx};
pub use string::{Format, StringSchema};
pub use traits::{SchemaLike, ValueValidator};

/// Entry point for creating validation schemas.
///
/// `Schema` provides factory methods for creating different schema types.
/// Each schema type validates specific value types and supports various
/// constraints through a builder pattern.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
///
/// let string_schema = Schema::string()
///     .min_len(1)
///     .max_len(100);
///
/// let email_schema = Schema::string()
///     .pattern(r"@")
///     .unwrap()
///     .error("must contain @");
/// ```
pub struct Schema;

impl Schema {
    /// Creates a new string schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().min_len(5);
    ///
    /// assert!(schema.safe_parse(&json!("hello")).is_success());
    /// assert!(schema.safe_parse(&json!("hi")).is_failure());
    /// ```
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a new number schema accepting integers and floats.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a new integer schema.
    ///
    /// Float values are rejected even when they have no fractional digits
    /// in their JSON form, e.g. `1.5`.
    pub fn integer() -> IntegerSchema {
        IntegerSchema::new()
    }

    /// Creates a new boolean schema.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates a schema accepting any set value.
    pub fn any() -> AnySchema {
        AnySchema::new()
    }

    /// Creates a new object schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object()
    ///     .field("name", Schema::string().min_len(1))
    ///     .field("age", Schema::integer().positive())
    ///     .field("email", Schema::string().optional())
    ///     .field("role", Schema::string().default("user"))
    ///     .additional_properties(false);
    ///
    /// let user = schema.parse(&json!({"name": "Alice", "age": 30})).unwrap();
    /// assert_eq!(user.get("role"), Some(&json!("user")));
    ///
    /// assert!(schema.parse(&json!({"name": "Bob"})).is_err());
    /// ```
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates an array schema whose items must pass `item_schema`.
    pub fn array<S: SchemaLike>(item_schema: S) -> ArraySchema<S> {
        ArraySchema::new(item_schema)
    }

    /// Creates a record schema whose values must pass `value_schema`.
    pub fn record<S: SchemaLike>(value_schema: S) -> RecordSchema<S> {
        RecordSchema::new(value_schema)
    }
}
