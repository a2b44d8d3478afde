//! Dotted field paths
//!
//! Provides [`FieldPath`] and the two accessors built on it,
//! [`get_nested_value`] and [`set_nested_value`].

use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::deep_clone;
use crate::value::FormValue;

/// Separator between path segments
pub const PATH_SEPARATOR: char = '.';

static UNDEFINED: FormValue = FormValue::Undefined;

/// Path to a single node in a value tree
///
/// Each segment is an object key, or a decimal index when the node it is
/// applied to is an array.
///
/// # Examples
/// - `users.0.name` → first user's name
/// - `address.city` → nested object member
///
/// Parsing is lenient: every segment is accepted, including empty ones, so
/// any string is a path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Create path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Split a dotted string into a path
    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self(path.split(PATH_SEPARATOR).map(str::to_owned).collect())
    }

    /// Create path from a single segment
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path has no segments (addresses the root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if any segments)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, parents)| Self(parents.to_vec()))
    }

    /// Get first segment
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Get last segment
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Resolve the node this path addresses
    ///
    /// Returns `None` when a node on the way is `null`/`undefined`, a
    /// segment does not match, or the resolved value is `undefined`.
    /// A resolved `null` is returned as-is.
    #[must_use]
    pub fn get<'a>(&self, tree: &'a FormValue) -> Option<&'a FormValue> {
        let mut current = tree;
        for segment in &self.0 {
            if current.is_nullish() {
                return None;
            }
            current = child_of(current, segment)?;
        }
        (!current.is_undefined()).then_some(current)
    }

    /// Copy of `tree` with `value` written at this path
    ///
    /// Missing, `null` or non-container intermediate nodes become fresh
    /// objects. Numeric segments never create arrays; an existing array is
    /// indexed, and an index equal to its length appends one element. Writes
    /// further past the end, or with a non-index segment, leave the copy
    /// unchanged.
    #[must_use]
    pub fn set(&self, tree: &FormValue, value: FormValue) -> FormValue {
        let mut result = deep_clone(tree);
        self.assign(&mut result, value);
        result
    }

    fn assign(&self, root: &mut FormValue, value: FormValue) {
        let Some((last, parents)) = self.0.split_last() else {
            *root = value;
            return;
        };

        if !is_container(root) {
            *root = FormValue::empty_object();
        }

        let mut current = root;
        for segment in parents {
            let Some(slot) = slot_of(current, segment) else {
                return;
            };
            if !is_container(slot) {
                *slot = FormValue::empty_object();
            }
            current = slot;
        }

        if let Some(slot) = slot_of(current, last) {
            *slot = value;
        }
    }
}

/// Parse a segment as an array index
///
/// Only canonical decimal integers qualify: `"0"`, `"12"`, but not `"01"`,
/// `"+1"` or `"-1"`.
#[must_use]
pub fn array_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

fn is_container(value: &FormValue) -> bool {
    matches!(value, FormValue::Object(_) | FormValue::Array(_))
}

fn child_of<'a>(node: &'a FormValue, segment: &str) -> Option<&'a FormValue> {
    match node {
        FormValue::Object(map) => map.get(segment),
        FormValue::Array(items) => array_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn slot_of<'a>(node: &'a mut FormValue, segment: &str) -> Option<&'a mut FormValue> {
    match node {
        FormValue::Object(map) => Some(map.entry(segment.to_owned()).or_default()),
        FormValue::Array(items) => {
            let index = array_index(segment)?;
            if index == items.len() {
                items.push(FormValue::Undefined);
            }
            items.get_mut(index)
        }
        _ => None,
    }
}

/// Read the value at a dotted path
///
/// Returns `default` (or `undefined` when `None`) if the path does not
/// resolve or resolves to `undefined`.
///
/// # Examples
/// ```
/// # use form_value::{get_nested_value, FormValue};
/// # use serde_json::json;
/// let tree = FormValue::from(json!({"users": [{"name": "John"}, {"name": "Jane"}]}));
/// assert_eq!(get_nested_value(&tree, "users.0.name", None), &FormValue::from("John"));
///
/// let fallback = FormValue::from("Default");
/// let empty = FormValue::empty_object();
/// assert_eq!(get_nested_value(&empty, "user.name", Some(&fallback)), &fallback);
/// ```
#[must_use]
pub fn get_nested_value<'a>(
    tree: &'a FormValue,
    path: &str,
    default: Option<&'a FormValue>,
) -> &'a FormValue {
    FieldPath::parse(path)
        .get(tree)
        .or(default)
        .unwrap_or(&UNDEFINED)
}

/// Copy of `tree` with `value` written at a dotted path
///
/// `tree` is left untouched. See [`FieldPath::set`] for how missing
/// intermediate nodes are created.
#[must_use]
pub fn set_nested_value(tree: &FormValue, path: &str, value: FormValue) -> FormValue {
    FieldPath::parse(path).set(tree, value)
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, "{PATH_SEPARATOR}")?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

impl From<Vec<String>> for FieldPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}
