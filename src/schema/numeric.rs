//! Numeric schema validation.
//!
//! This module provides [`NumberSchema`] for any JSON number and
//! [`IntegerSchema`] for whole numbers, both with bound and sign constraints.

use std::ops::RangeInclusive;

use serde_json::{json, Number, Value};
use stillwater::Validation;

use crate::error::{codes, SchemaError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::refine::Extensions;
use super::traits::{required_error, type_error, SchemaLike};

/// A constraint applied to number values.
#[derive(Clone)]
enum NumberConstraint {
    Min { value: f64, message: Option<String> },
    Max { value: f64, message: Option<String> },
    Int { message: Option<String> },
    Positive { message: Option<String> },
}

/// A schema for validating JSON numbers as `f64`.
///
/// Input is read as `f64`, so integers beyond 2^53 in magnitude round to the
/// nearest representable value (9007199254740993 becomes 9007199254740992).
/// The rounded value is stable under re-validation. Use [`IntegerSchema`]
/// for exact 64-bit integers.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::number().min(0.0).max(1.0);
///
/// assert_eq!(schema.parse(&json!(0.5)).unwrap(), 0.5);
/// assert!(schema.parse(&json!(1.5)).is_err());
/// ```
pub struct NumberSchema {
    constraints: Vec<NumberConstraint>,
    type_error_message: Option<String>,
    extensions: Extensions<f64>,
}

impl NumberSchema {
    /// Creates a new number schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
            extensions: Extensions::new(),
        }
    }

    /// Adds an inclusive lower bound.
    pub fn min(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Min {
            value,
            message: None,
        });
        self
    }

    /// Adds an inclusive upper bound.
    pub fn max(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Max {
            value,
            message: None,
        });
        self
    }

    /// Requires the number to have no fractional part.
    pub fn int(mut self) -> Self {
        self.constraints.push(NumberConstraint::Int { message: None });
        self
    }

    /// Requires the number to be greater than 0.
    pub fn positive(mut self) -> Self {
        self.constraints
            .push(NumberConstraint::Positive { message: None });
        self
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                NumberConstraint::Min { message: m, .. }
                | NumberConstraint::Max { message: m, .. }
                | NumberConstraint::Int { message: m }
                | NumberConstraint::Positive { message: m } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for NumberSchema {
    type Output = f64;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<f64> {
        let Some(value) = value else {
            return Validation::Failure(required_error(ctx, "number"));
        };
        let Some(n) = value.as_f64() else {
            return Validation::Failure(type_error(
                ctx,
                "number",
                value,
                self.type_error_message.as_ref(),
            ));
        };

        let errors: Vec<SchemaError> = self
            .constraints
            .iter()
            .filter_map(|c| check_number_constraint(c, n, ctx))
            .collect();

        match SchemaErrors::try_from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(n),
        }
    }

    fn to_value(&self, output: f64) -> Option<Value> {
        Some(number_to_value(output))
    }

    fn extensions(&self) -> &Extensions<f64> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<f64> {
        &mut self.extensions
    }
}

/// Renders integral values as JSON integers so `5` stays `5` rather than `5.0`.
///
/// `i64::MAX as f64` is 2^63, one past the range, so the upper bound is strict.
fn number_to_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Value::Number((n as i64).into())
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn check_number_constraint(
    constraint: &NumberConstraint,
    value: f64,
    ctx: &ValidationContext<'_>,
) -> Option<SchemaError> {
    let path = ctx.path().clone();
    match constraint {
        NumberConstraint::Min { value: min, message } => (value < *min).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("must be at least {}, got {}", min, value));
            SchemaError::new(path, msg)
                .with_code(codes::TOO_SMALL)
                .with_expected(format!("at least {}", min))
                .with_received(number_to_value(value))
        }),
        NumberConstraint::Max { value: max, message } => (value > *max).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("must be at most {}, got {}", max, value));
            SchemaError::new(path, msg)
                .with_code(codes::TOO_BIG)
                .with_expected(format!("at most {}", max))
                .with_received(number_to_value(value))
        }),
        NumberConstraint::Int { message } => (value.fract() != 0.0).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| "expected integer, got float".to_string());
            SchemaError::new(path, msg)
                .with_code(codes::INVALID_TYPE)
                .with_expected("integer")
                .with_received("float")
        }),
        NumberConstraint::Positive { message } => (value <= 0.0).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("must be positive, got {}", value));
            SchemaError::new(path, msg)
                .with_code(codes::TOO_SMALL)
                .with_expected("positive number")
                .with_received(number_to_value(value))
        }),
    }
}

impl ToJsonSchema for NumberSchema {
    fn to_json_schema(&self) -> Value {
        let is_int = self
            .constraints
            .iter()
            .any(|c| matches!(c, NumberConstraint::Int { .. }));
        let kind = if is_int { "integer" } else { "number" };
        let mut schema = json!({ "type": kind });
        for constraint in &self.constraints {
            match constraint {
                NumberConstraint::Min { value, .. } => schema["minimum"] = json!(value),
                NumberConstraint::Max { value, .. } => schema["maximum"] = json!(value),
                NumberConstraint::Positive { .. } => schema["exclusiveMinimum"] = json!(0),
                NumberConstraint::Int { .. } => {}
            }
        }
        schema
    }
}

/// A constraint applied to integer values.
#[derive(Clone)]
enum IntegerConstraint {
    Min { value: i64, message: Option<String> },
    Max { value: i64, message: Option<String> },
    Positive { message: Option<String> },
    NonNegative { message: Option<String> },
    Negative { message: Option<String> },
}

/// A schema for validating integer values.
///
/// `IntegerSchema` validates that values are integers and optionally applies
/// constraints like minimum/maximum value and sign requirements. All constraint
/// violations are accumulated rather than short-circuiting on the first failure.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::integer().range(1..=100);
///
/// assert_eq!(schema.parse(&json!(50)).unwrap(), 50);
/// assert!(schema.parse(&json!(150)).is_err());
/// assert!(schema.parse(&json!(1.5)).is_err());
/// ```
pub struct IntegerSchema {
    constraints: Vec<IntegerConstraint>,
    type_error_message: Option<String>,
    extensions: Extensions<i64>,
}

impl IntegerSchema {
    /// Creates a new integer schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
            extensions: Extensions::new(),
        }
    }

    /// Adds a minimum value constraint (inclusive).
    pub fn min(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Min {
            value,
            message: None,
        });
        self
    }

    /// Adds a maximum value constraint (inclusive).
    pub fn max(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Max {
            value,
            message: None,
        });
        self
    }

    /// Adds both minimum and maximum value constraints (inclusive range).
    ///
    /// This is a convenience method equivalent to calling `.min(start).max(end)`.
    pub fn range(self, range: RangeInclusive<i64>) -> Self {
        self.min(*range.start()).max(*range.end())
    }

    /// The integer must be greater than 0.
    pub fn positive(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::Positive { message: None });
        self
    }

    /// The integer must be greater than or equal to 0.
    pub fn non_negative(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::NonNegative { message: None });
        self
    }

    /// The integer must be less than 0.
    pub fn negative(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::Negative { message: None });
        self
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error message
    /// (used when the value is not an integer).
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::integer()
    ///     .min(18)
    ///     .error("must be at least 18 years old");
    ///
    /// let errors = schema.parse(&json!(16)).unwrap_err();
    /// assert_eq!(errors.first().message, "must be at least 18 years old");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                IntegerConstraint::Min { message: m, .. }
                | IntegerConstraint::Max { message: m, .. }
                | IntegerConstraint::Positive { message: m }
                | IntegerConstraint::NonNegative { message: m }
                | IntegerConstraint::Negative { message: m } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl Default for IntegerSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for IntegerSchema {
    type Output = i64;

    fn validate(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext<'_>,
    ) -> ValidationResult<i64> {
        let Some(value) = value else {
            return Validation::Failure(required_error(ctx, "integer"));
        };
        let n = match value {
            Value::Number(num) => match num.as_i64() {
                Some(n) => n,
                None if num.is_u64() => {
                    let message = self
                        .type_error_message
                        .clone()
                        .unwrap_or_else(|| "integer value too large for i64".to_string());
                    return Validation::Failure(SchemaErrors::single(
                        SchemaError::new(ctx.path().clone(), message)
                            .with_code(codes::TOO_BIG)
                            .with_expected("integer in i64 range")
                            .with_received(value.clone()),
                    ));
                }
                None => {
                    let message = self
                        .type_error_message
                        .clone()
                        .unwrap_or_else(|| "expected integer, got float".to_string());
                    return Validation::Failure(SchemaErrors::single(
                        SchemaError::new(ctx.path().clone(), message)
                            .with_code(codes::INVALID_TYPE)
                            .with_expected("integer")
                            .with_received("float"),
                    ));
                }
            },
            other => {
                return Validation::Failure(type_error(
                    ctx,
                    "integer",
                    other,
                    self.type_error_message.as_ref(),
                ))
            }
        };

        let errors: Vec<SchemaError> = self
            .constraints
            .iter()
            .filter_map(|c| check_integer_constraint(c, n, ctx))
            .collect();

        match SchemaErrors::try_from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(n),
        }
    }

    fn to_value(&self, output: i64) -> Option<Value> {
        Some(Value::Number(output.into()))
    }

    fn extensions(&self) -> &Extensions<i64> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions<i64> {
        &mut self.extensions
    }
}

/// Checks a single constraint and returns an error if it fails.
fn check_integer_constraint(
    constraint: &IntegerConstraint,
    value: i64,
    ctx: &ValidationContext<'_>,
) -> Option<SchemaError> {
    let path = ctx.path().clone();
    let (failed, code, expected, default_message, message) = match constraint {
        IntegerConstraint::Min {
            value: min,
            message,
        } => (
            value < *min,
            codes::TOO_SMALL,
            format!("at least {}", min),
            format!("must be at least {}, got {}", min, value),
            message,
        ),
        IntegerConstraint::Max {
            value: max,
            message,
        } => (
            value > *max,
            codes::TOO_BIG,
            format!("at most {}", max),
            format!("must be at most {}, got {}", max, value),
            message,
        ),
        IntegerConstraint::Positive { message } => (
            value <= 0,
            codes::TOO_SMALL,
            "positive integer".to_string(),
            format!("must be positive, got {}", value),
            message,
        ),
        IntegerConstraint::NonNegative { message } => (
            value < 0,
            codes::TOO_SMALL,
            "non-negative integer".to_string(),
            format!("must be non-negative, got {}", value),
            message,
        ),
        IntegerConstraint::Negative { message } => (
            value >= 0,
            codes::TOO_BIG,
            "negative integer".to_string(),
            format!("must be negative, got {}", value),
            message,
        ),
    };

    failed.then(|| {
        SchemaError::new(path, message.clone().unwrap_or(default_message))
            .with_code(code)
            .with_expected(expected)
            .with_received(value)
    })
}

impl ToJsonSchema for IntegerSchema {
    fn to_json_schema(&self) -> Value {
        let mut schema = json!({ "type": "integer" });
        for constraint in &self.constraints {
            match constraint {
                IntegerConstraint::Min { value, .. } => schema["minimum"] = json!(value),
                IntegerConstraint::Max { value, .. } => schema["maximum"] = json!(value),
                IntegerConstraint::Positive { .. } => schema["exclusiveMinimum"] = json!(0),
                IntegerConstraint::NonNegative { .. } => schema["minimum"] = json!(0),
                IntegerConstraint::Negative { .. } => schema["exclusiveMaximum"] = json!(0),
            }
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codes_of<T>(result: ValidationResult<T>) -> Vec<String> {
        match result {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors
                .iter()
                .filter_map(|e| e.code.clone())
                .collect(),
        }
    }

    #[test]
    fn test_number_accepts_ints_and_floats() {
        let schema = NumberSchema::new();
        assert_eq!(schema.parse(&json!(3)).unwrap(), 3.0);
        assert_eq!(schema.parse(&json!(2.5)).unwrap(), 2.5);
    }

    #[test]
    fn test_number_rejects_other_kinds() {
        let schema = NumberSchema::new();
        assert_eq!(codes_of(schema.safe_parse(&json!("3"))), vec!["invalid_type"]);
        assert_eq!(codes_of(schema.safe_parse(&json!(null))), vec!["invalid_type"]);
        assert_eq!(codes_of(schema.safe_parse_input(None)), vec!["required"]);
    }

    #[test]
    fn test_number_bounds_accumulate() {
        let schema = NumberSchema::new().min(10.0).int();
        assert_eq!(
            codes_of(schema.safe_parse(&json!(2.5))),
            vec!["too_small", "invalid_type"]
        );
    }

    #[test]
    fn test_number_positive() {
        let schema = NumberSchema::new().positive().error("must be > 0");
        let errors = schema.parse(&json!(0)).unwrap_err();
        assert_eq!(errors.first().message, "must be > 0");
        assert!(errors.first().has_code(codes::TOO_SMALL));
    }

    #[test]
    fn test_number_to_value_keeps_integers() {
        let schema = NumberSchema::new();
        assert_eq!(schema.to_value(5.0), Some(json!(5)));
        assert_eq!(schema.to_value(0.25), Some(json!(0.25)));
    }

    #[test]
    fn test_large_integers_round_once_then_stay() {
        let big = json!(9_007_199_254_740_993_u64);
        let number = NumberSchema::new();

        let first = number.parse(&big).unwrap();
        assert_eq!(first, 9_007_199_254_740_992.0);
        let written = number.to_value(first).unwrap();
        assert_eq!(written, json!(9_007_199_254_740_992_i64));
        assert_eq!(number.parse(&written).unwrap(), first);

        let exact = IntegerSchema::new().parse(&big).unwrap();
        assert_eq!(exact, 9_007_199_254_740_993);
        assert_eq!(IntegerSchema::new().to_value(exact), Some(big));
    }

    #[test]
    fn test_number_to_value_past_i64_range() {
        let two_pow_63 = 9_223_372_036_854_775_808.0;
        let written = NumberSchema::new().to_value(two_pow_63).unwrap();
        assert_eq!(written.as_f64(), Some(two_pow_63));
        assert_ne!(written, json!(i64::MAX));
    }

    #[test]
    fn test_integer_rejects_float() {
        let errors = IntegerSchema::new().parse(&json!(1.5)).unwrap_err();
        assert!(errors.first().has_code(codes::INVALID_TYPE));
        assert_eq!(errors.first().received, Some(json!("float")));
    }

    #[test]
    fn test_integer_overflow() {
        let errors = IntegerSchema::new().parse(&json!(u64::MAX)).unwrap_err();
        assert!(errors.first().has_code(codes::TOO_BIG));
    }

    #[test]
    fn test_integer_range_and_sign() {
        let schema = IntegerSchema::new().range(1..=10);
        assert!(schema.safe_parse(&json!(1)).is_success());
        assert!(schema.safe_parse(&json!(10)).is_success());
        assert_eq!(codes_of(schema.safe_parse(&json!(0))), vec!["too_small"]);
        assert_eq!(codes_of(schema.safe_parse(&json!(11))), vec!["too_big"]);

        assert!(IntegerSchema::new().non_negative().safe_parse(&json!(0)).is_success());
        assert!(IntegerSchema::new().negative().safe_parse(&json!(0)).is_failure());
        assert!(IntegerSchema::new().positive().safe_parse(&json!(0)).is_failure());
    }

    #[test]
    fn test_integer_json_schema() {
        assert_eq!(
            IntegerSchema::new().min(1).max(5).to_json_schema(),
            json!({"type": "integer", "minimum": 1, "maximum": 5})
        );
        assert_eq!(
            NumberSchema::new().int().positive().to_json_schema(),
            json!({"type": "integer", "exclusiveMinimum": 0})
        );
    }
}
