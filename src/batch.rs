//! Parallel validation of independent inputs.

use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::schema::SchemaLike;
use crate::ValidationResult;

/// Validates every value against `schema` in parallel.
///
/// Each input gets its own root context; results come back in input order.
///
/// # Example
///
/// ```rust
/// use inquest::{batch, Schema};
/// use serde_json::json;
///
/// let schema = Schema::integer().positive();
/// let results = batch::safe_parse_batch(&schema, &[json!(1), json!(-1), json!("x")]);
///
/// let ok: Vec<bool> = results.iter().map(|r| r.is_success()).collect();
/// assert_eq!(ok, vec![true, false, false]);
/// ```
pub fn safe_parse_batch<S>(schema: &S, values: &[Value]) -> Vec<ValidationResult<S::Output>>
where
    S: SchemaLike,
    S::Output: Send,
{
    debug!(inputs = values.len(), "validating batch");
    values
        .par_iter()
        .map(|value| schema.safe_parse(value))
        .collect()
}
