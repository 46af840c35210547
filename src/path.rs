//! Locations inside a validated input.
//!
//! A [`JsonPath`] is an ordered list of [`PathSegment`]s, each either an object
//! key or an array index. Errors carry the path of the value they describe,
//! always measured from the root input of the top-level call.
//!
//! Paths render in dotted form (`users[0].email`). Keys that would make the
//! dotted form ambiguous (empty, or containing `.`, `[`, `]` or whitespace)
//! are written in bracketed JSON form instead, e.g. `headers["x.y"]`.

use std::fmt::{self, Display, Write as _};

use serde_json::Value;

/// One step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key.
    Field(String),
    /// Array position.
    Index(usize),
}

impl PathSegment {
    /// Key segment.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Index segment.
    pub fn index(idx: usize) -> Self {
        Self::Index(idx)
    }

    /// The segment as it appears in the serialized error shape: a string or a number.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Field(name) => Value::String(name.clone()),
            Self::Index(idx) => Value::from(*idx),
        }
    }

    fn needs_brackets(name: &str) -> bool {
        name.is_empty()
            || name
                .chars()
                .any(|c| matches!(c, '.' | '[' | ']') || c.is_whitespace())
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::field(name)
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        Self::Index(idx)
    }
}

/// Immutable path from the root input to a nested value.
///
/// Extending a path never modifies it; `push`, `join` and friends return a new
/// path, so a composite can hand one prefix to every child.
///
/// # Example
///
/// ```rust
/// use inquest::JsonPath;
/// use serde_json::json;
///
/// let path = JsonPath::from_field("orders").push_index(3).push_field("sku");
///
/// assert_eq!(path.to_string(), "orders[3].sku");
/// assert_eq!(path.to_value(), json!(["orders", 3, "sku"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The empty path, pointing at the root input.
    pub fn root() -> Self {
        Self::default()
    }

    /// A one-segment path naming a key.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self::root().push_field(name)
    }

    /// A one-segment path naming an index.
    pub fn from_index(idx: usize) -> Self {
        Self::root().push_index(idx)
    }

    /// Builds a path from segments, outermost first.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        segments.into_iter().map(Into::into).collect()
    }

    /// Copy of this path extended by a key.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        self.push(PathSegment::field(name))
    }

    /// Copy of this path extended by an index.
    pub fn push_index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    /// Copy of this path extended by one segment.
    pub fn push(&self, segment: impl Into<PathSegment>) -> Self {
        self.segments
            .iter()
            .cloned()
            .chain(std::iter::once(segment.into()))
            .collect()
    }

    /// Copy of this path followed by `suffix`.
    pub fn join(&self, suffix: &JsonPath) -> Self {
        self.segments
            .iter()
            .chain(&suffix.segments)
            .cloned()
            .collect()
    }

    /// Copy of this path placed under `prefix`; re-parents a child-relative path.
    pub fn prepend(&self, prefix: &JsonPath) -> Self {
        prefix.join(self)
    }

    /// Returns true for the empty path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as [`JsonPath::is_root`].
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Path of the enclosing container; `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// The innermost segment; `None` at the root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The path as a JSON array of keys and indices.
    pub fn to_value(&self) -> Value {
        Value::Array(self.segments.iter().map(PathSegment::to_value).collect())
    }

    /// Follows the path inside `root`.
    ///
    /// A key step only enters objects and an index step only enters arrays.
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.segments.iter().try_fold(root, |node, segment| match segment {
            PathSegment::Field(name) => node.as_object()?.get(name),
            PathSegment::Index(idx) => node.as_array()?.get(*idx),
        })
    }
}

impl FromIterator<PathSegment> for JsonPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
                PathSegment::Field(name) if PathSegment::needs_brackets(name) => {
                    write!(f, "[{}]", Value::String(name.clone()))?
                }
                PathSegment::Field(name) => {
                    if !first {
                        f.write_char('.')?;
                    }
                    f.write_str(name)?;
                }
            }
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_forms() {
        assert_eq!(JsonPath::root().to_string(), "");
        assert_eq!(JsonPath::from_index(2).push_field("id").to_string(), "[2].id");
        assert_eq!(
            JsonPath::from_field("headers").push_field("x.y").to_string(),
            r#"headers["x.y"]"#
        );
        assert_eq!(JsonPath::from_field("").to_string(), r#"[""]"#);
        assert_eq!(JsonPath::from_field("Bad-Key").to_string(), "Bad-Key");
    }

    #[test]
    fn test_to_value() {
        let path = JsonPath::from_segments([PathSegment::field("a"), PathSegment::index(1)]);
        assert_eq!(path.to_value(), json!(["a", 1]));
        assert_eq!(JsonPath::root().to_value(), json!([]));
    }

    #[test]
    fn test_parent_walks_to_root() {
        let path = JsonPath::from_field("a").push_index(0);
        let parent = path.parent().unwrap();
        assert_eq!(parent, JsonPath::from_field("a"));
        assert!(parent.parent().unwrap().is_root());
        assert!(JsonPath::root().parent().is_none());
    }

    #[test]
    fn test_resolve_respects_container_kind() {
        let root = json!({"list": [{"k": 1}], "map": {"0": "zero"}});
        assert_eq!(
            JsonPath::from_field("list").push_index(0).push_field("k").resolve(&root),
            Some(&json!(1))
        );
        assert_eq!(JsonPath::from_field("map").push_index(0).resolve(&root), None);
        assert_eq!(JsonPath::from_field("map").push_field("0").resolve(&root), Some(&json!("zero")));
    }
}
