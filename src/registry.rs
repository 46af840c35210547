//! Named schemas.
//!
//! Services that receive several payload kinds keep one [`SchemaRegistry`],
//! validate each payload by the name of its kind, and publish every schema as
//! one JSON Schema document.

use parking_lot::RwLock;
use rayon::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::Validation;
use tracing::debug;

use crate::error::SchemaErrors;
use crate::schema::ValueValidator;
use crate::validation::ValidationContext;
use crate::ValidationResult;

type SchemaMap = Arc<RwLock<HashMap<String, Arc<dyn ValueValidator>>>>;

/// Shared map from names to type-erased schemas.
///
/// Lookups take a read lock only long enough to clone the schema's `Arc`, so
/// validations on many threads never wait on each other; `register` takes the
/// write lock. Clones share one map.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, SchemaLike, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry
///     .register(
///         "Signup",
///         Schema::object()
///             .field("email", Schema::string().email())
///             .field("plan", Schema::string().default("free")),
///     )
///     .unwrap();
///
/// let signup = registry.parse("Signup", &json!({"email": "a@b.io"})).unwrap();
/// assert_eq!(signup["plan"], "free");
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stores `schema` under `name`.
    ///
    /// A name can be registered once; a second registration fails with
    /// `RegistryError::DuplicateName` and leaves the first schema in place.
    pub fn register<S>(&self, name: impl Into<String>, schema: S) -> Result<(), RegistryError>
    where
        S: ValueValidator + 'static,
    {
        let name = name.into();
        match self.schemas.write().entry(name) {
            Entry::Occupied(taken) => Err(RegistryError::DuplicateName(taken.key().clone())),
            Entry::Vacant(slot) => {
                debug!(schema = %slot.key(), "registering schema");
                slot.insert(Arc::new(schema));
                Ok(())
            }
        }
    }

    /// The schema registered as `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ValueValidator>> {
        self.schemas.read().get(name).cloned()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns true when no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    fn lookup(&self, name: &str) -> Result<Arc<dyn ValueValidator>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))
    }

    /// Runs the schema registered as `name` against `value`.
    ///
    /// The outer `Result` only fails for an unknown name; validation failures
    /// come back inside the `Validation`. Output that has no value (an
    /// accepted null, say) is reported as `Value::Null`.
    pub fn safe_parse(
        &self,
        name: &str,
        value: &Value,
    ) -> Result<ValidationResult<Value>, RegistryError> {
        let schema = self.lookup(name)?;
        debug!(schema = %name, "validating against registered schema");
        Ok(run(schema.as_ref(), value))
    }

    /// Like [`SchemaRegistry::safe_parse`], with invalid input folded into
    /// `RegistryError::Validation`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{RegistryError, Schema, SchemaRegistry};
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("Age", Schema::integer().non_negative()).unwrap();
    ///
    /// assert_eq!(registry.parse("Age", &json!(4)).unwrap(), json!(4));
    /// assert!(matches!(registry.parse("Age", &json!(-4)), Err(RegistryError::Validation(_))));
    /// assert!(matches!(registry.parse("Nope", &json!(1)), Err(RegistryError::SchemaNotFound(_))));
    /// ```
    pub fn parse(&self, name: &str, value: &Value) -> Result<Value, RegistryError> {
        match self.safe_parse(name, value)? {
            Validation::Success(output) => Ok(output),
            Validation::Failure(errors) => {
                debug!(schema = %name, errors = errors.len(), "validation failed");
                Err(RegistryError::Validation(errors))
            }
        }
    }

    /// Validates independent inputs on the rayon pool; results keep input order.
    pub fn safe_parse_batch(
        &self,
        name: &str,
        values: &[Value],
    ) -> Result<Vec<ValidationResult<Value>>, RegistryError> {
        let schema = self.lookup(name)?;
        debug!(schema = %name, inputs = values.len(), "validating batch");
        Ok(values
            .par_iter()
            .map(|value| run(schema.as_ref(), value))
            .collect())
    }

    /// One draft 2020-12 document with every schema under `$defs`, sorted by name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Schema, SchemaRegistry};
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("UserId", Schema::integer().positive()).unwrap();
    ///
    /// let doc = registry.to_json_schema();
    /// assert_eq!(doc["$defs"]["UserId"], json!({"type": "integer", "exclusiveMinimum": 0}));
    /// ```
    pub fn to_json_schema(&self) -> Value {
        let schemas = self.schemas.read();
        let mut defs: Vec<(String, Value)> = schemas
            .iter()
            .map(|(name, schema)| (name.clone(), schema.descriptor()))
            .collect();
        defs.sort_by(|a, b| a.0.cmp(&b.0));
        let defs: Map<String, Value> = defs.into_iter().collect();

        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$defs": defs
        })
    }
}

fn run(schema: &dyn ValueValidator, value: &Value) -> ValidationResult<Value> {
    let mut ctx = ValidationContext::new(Some(value));
    schema
        .safe_parse_value(Some(value), &mut ctx)
        .map(|output| output.unwrap_or(Value::Null))
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
        }
    }
}

/// Failures of registry calls.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    #[error("schema '{0}' not found")]
    SchemaNotFound(String),

    /// The input was checked and rejected.
    #[error(transparent)]
    Validation(#[from] SchemaErrors),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::SchemaLike;
    use serde_json::json;

    #[test]
    fn test_names_sorted() {
        let registry = SchemaRegistry::new();
        registry.register("b", Schema::string()).unwrap();
        registry.register("a", Schema::integer()).unwrap();
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = SchemaRegistry::new();
        let clone = registry.clone();
        clone.register("x", Schema::boolean()).unwrap();
        assert!(registry.get("x").is_some());
    }

    #[test]
    fn test_unset_output_becomes_null() {
        let registry = SchemaRegistry::new();
        registry.register("maybe", Schema::string().nullable()).unwrap();
        assert_eq!(registry.parse("maybe", &json!(null)).unwrap(), Value::Null);
    }
}
