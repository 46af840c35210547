//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! constraints like minimum/maximum length, regex patterns and format presets.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::{codes, SchemaError, SchemaErrors};
use crate::interop::json_schema::format_to_json_schema_format;
use crate::interop::ToJsonSchema;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::refine::Extensions;
use super::traits::{required_error, type_error, SchemaLike};

/// Well-known string formats, each checked by one fixed regular expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `local@domain.tld`
    Email,
    /// `http://` or `https://` URL
    Url,
    /// Hyphenated RFC 4122 UUID
    Uuid,
}

impl Format {
    fn name(self) -> &'static str {
        match self {
            Format::Email => "Email",
            Format::Url => "Url",
            Format::Uuid => "Uuid",
        }
    }

    fn regex(self) -> &'static Regex {
        static EMAIL: OnceLock<Regex> = OnceLock::new();
        static URL: OnceLock<Regex> = OnceLock::new();
        static UUID: OnceLock<Regex> = OnceLock::new();

        let (cell, pattern) = match self {
            Format::Email => (&EMAIL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$"),
            Format::Url => (&URL, r"^https?://[^\s/$.?#][^\s]*$"),
            Format::Uuid => (
                &UUID,
                r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
            ),
        };
        cell.get_or_init(|| Regex::new(pattern).expect("built-in format pattern is valid"))
    }
}

/// A constraint applied to string values.
#[derive(Clone)]
enum StringConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        pattern_str: String,
        message: Option<String>,
    },
    Format {
        format: Format,
        message: Option<String>,
    },
    NonEmpty {
        message: Option<String>,
    },
}

/// A schema for validating string values.
///
/// `StringSchema` validates that values are strings and optionally applies
/// constraints like minimum/maximum length and regex patterns. All constraint
/// violations are accumulated rather than short-circuiting on the first failure.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string()
///     .min_len(3)
///     .max_len(20)
///     .pattern(r"^[a-z]+$")
///     .unwrap();
///
/// // Reports both: too short AND pattern mismatch
/// let errors = schema.parse(&json!("AB")).unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
    type_error_message: Option<String>,
    extensions: Extensions<String>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
            extensions: Extensions::new(),
        }
    }

    /// Adds a minimum length constraint, counted in Unicode scalar values.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// Adds a maximum length constraint, counted in Unicode scalar values.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// Adds a regex pattern constraint.
    ///
    /// Returns an error if the regex pattern is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().pattern(r"^\d+$").unwrap();
    ///
    /// assert!(schema.parse(&json!("12345")).is_ok());
    /// assert!(schema.parse(&json!("abc")).is_err());
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            pattern_str: pattern.to_string(),
            message: None,
        });
        Ok(self)
    }

    /// Requires a non-empty string; an empty one is reported as `required`.
    pub fn required(mut self) -> Self {
        self.constraints
            .push(StringConstraint::NonEmpty { message: None });
        self
    }

    /// Requires the string to look like an email address.
    pub fn email(self) -> Self {
        self.format(Format::Email)
    }

    /// Requires the string to be an http(s) URL.
    pub fn url(self) -> Self {
        self.format(Format::Url)
    }

    /// Requires the string to be a hyphenated UUID.
    pub fn uuid(self) -> Self {
        self.format(Format::Uuid)
    }

    /// Requires the string to match a format preset.
    pub fn format(mut self, format: Format) -> Self {
        self.constraints.push(StringConstraint::Format {
            format,
            message: None,
        });
        self
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error message
    /// (used when the value is not a string).
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                StringConstraint::MinLength { message: m, .. }
                | StringConstraint::MaxLength { message: m, .. }
                | StringConstraint::Pattern { message: m, .. }
                | StringConstraint::Format { message: m, .. }
                | StringConstraint::NonEmpty { message: m } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for StringSchema {
    type Output = String;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<String> {
        let Some(value) = value else {
            return Validation::Failure(required_error(ctx, "string"));
        };
        let Some(s) = value.as_str() else {
            return Validation::Failure(type_error(
                ctx,
                "string",
                value,
                self.type_error_message.as_ref(),
            ));
        };

        let errors: Vec<SchemaError> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, s, ctx))
            .collect();

        match SchemaErrors::try_from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(s.to_string()),
        }
    }

    fn to_value(&self, output: String) -> Option<Value> {
        Some(Value::String(output))
    }

    fn extensions(&self) -> &Extensions<String> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<String> {
        &mut self.extensions
    }
}

/// Checks a single constraint and returns an error if it fails.
fn check_constraint(
    constraint: &StringConstraint,
    value: &str,
    ctx: &ValidationContext<'_>,
) -> Option<SchemaError> {
    let path = ctx.path().clone();
    match constraint {
        StringConstraint::MinLength { min, message } => {
            let len = value.chars().count();
            (len < *min).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("length must be at least {}, got {}", min, len));
                SchemaError::new(path, msg)
                    .with_code(codes::TOO_SMALL)
                    .with_expected(format!("at least {} characters", min))
                    .with_received(format!("{} characters", len))
            })
        }
        StringConstraint::MaxLength { max, message } => {
            let len = value.chars().count();
            (len > *max).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("length must be at most {}, got {}", max, len));
                SchemaError::new(path, msg)
                    .with_code(codes::TOO_BIG)
                    .with_expected(format!("at most {} characters", max))
                    .with_received(format!("{} characters", len))
            })
        }
        StringConstraint::Pattern {
            regex,
            pattern_str,
            message,
        } => (!regex.is_match(value)).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("must match pattern '{}'", pattern_str));
            SchemaError::new(path, msg)
                .with_code(codes::PATTERN)
                .with_expected(format!("string matching '{}'", pattern_str))
                .with_value(value)
        }),
        StringConstraint::Format { format, message } => {
            (!format.regex().is_match(value)).then(|| {
                let name = format_to_json_schema_format(format.name());
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must be a valid {}", name));
                SchemaError::new(path, msg)
                    .with_code(codes::PATTERN)
                    .with_expected(name)
                    .with_value(value)
            })
        }
        StringConstraint::NonEmpty { message } => value.is_empty().then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| "required".to_string());
            SchemaError::new(path, msg)
                .with_code(codes::REQUIRED)
                .with_expected("non-empty string")
        }),
    }
}

impl ToJsonSchema for StringSchema {
    fn to_json_schema(&self) -> Value {
        let mut schema = json!({ "type": "string" });
        for constraint in &self.constraints {
            match constraint {
                StringConstraint::MinLength { min, .. } => schema["minLength"] = json!(min),
                StringConstraint::MaxLength { max, .. } => schema["maxLength"] = json!(max),
                StringConstraint::Pattern { pattern_str, .. } => {
                    schema["pattern"] = json!(pattern_str)
                }
                StringConstraint::Format { format, .. } => {
                    schema["format"] = json!(format_to_json_schema_format(format.name()))
                }
                StringConstraint::NonEmpty { .. } => schema["minLength"] = json!(1),
            }
        }
        schema
    }
}
