//! Interoperability with other schema formats.
//!
//! This module provides conversion from inquest schemas into descriptor
//! documents in JSON Schema form, used for form generation and documentation.

pub mod json_schema;

pub use json_schema::ToJsonSchema;
