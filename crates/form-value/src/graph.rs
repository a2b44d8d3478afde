//! Object graph utilities
//!
//! Type predicates, emptiness, defensive cloning and structural equality
//! over [`FormValue`] trees. Everything else in the workspace builds on
//! these four functions.

use crate::value::FormValue;

/// Check whether a value is an object (including dates), but not an array
///
/// Dates pass this check; recursive algorithms use [`is_plain_object`] and
/// treat dates as leaves.
#[inline]
#[must_use]
pub fn is_object(value: &FormValue) -> bool {
    matches!(value, FormValue::Object(_) | FormValue::Date(_))
}

/// Check whether a value is a key/value object
#[inline]
#[must_use]
pub fn is_plain_object(value: &FormValue) -> bool {
    matches!(value, FormValue::Object(_))
}

/// Check whether a value carries no user input
///
/// Empty means `null`/`undefined`, a whitespace-only string, a zero-length
/// array or a key-less object. `0`, `false` and dates are never empty.
#[must_use]
pub fn is_empty(value: &FormValue) -> bool {
    match value {
        FormValue::Undefined | FormValue::Null => true,
        FormValue::String(s) => trim_form_whitespace(s).is_empty(),
        FormValue::Array(items) => items.is_empty(),
        FormValue::Object(map) => map.is_empty(),
        FormValue::Bool(_) | FormValue::Number(_) | FormValue::Date(_) => false,
    }
}

// A pasted byte-order mark counts as whitespace.
fn trim_form_whitespace(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Structurally equal copy of a value sharing nothing with its source
#[must_use]
pub fn deep_clone(value: &FormValue) -> FormValue {
    match value {
        FormValue::Undefined => FormValue::Undefined,
        FormValue::Null => FormValue::Null,
        FormValue::Bool(b) => FormValue::Bool(*b),
        FormValue::Number(n) => FormValue::Number(*n),
        FormValue::String(s) => FormValue::String(s.clone()),
        FormValue::Date(d) => FormValue::Date(*d),
        FormValue::Array(items) => FormValue::Array(items.iter().map(deep_clone).collect()),
        FormValue::Object(map) => FormValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), deep_clone(v)))
                .collect(),
        ),
    }
}

/// Coarse type classes used by [`deep_equal`]
#[derive(PartialEq, Eq)]
enum TypeClass {
    Undefined,
    Boolean,
    Number,
    String,
    Object,
}

fn type_class(value: &FormValue) -> TypeClass {
    match value {
        FormValue::Undefined => TypeClass::Undefined,
        FormValue::Bool(_) => TypeClass::Boolean,
        FormValue::Number(_) => TypeClass::Number,
        FormValue::String(_) => TypeClass::String,
        FormValue::Null | FormValue::Date(_) | FormValue::Array(_) | FormValue::Object(_) => {
            TypeClass::Object
        }
    }
}

/// Structural equality
///
/// - `null`/`undefined` on either side: equal only to the same tag
///   (`null` is not equal to `undefined`)
/// - different type classes: not equal
/// - primitives: strict equality (`NaN` is unequal to itself)
/// - dates: same epoch millisecond
/// - arrays: same length, pairwise equal; never equal to a non-array
/// - objects: same key count and every key of `a` present in `b` with an
///   equal value
#[allow(clippy::float_cmp)]
#[must_use]
pub fn deep_equal(a: &FormValue, b: &FormValue) -> bool {
    if a.is_nullish() || b.is_nullish() {
        return a.kind() == b.kind();
    }
    if type_class(a) != type_class(b) {
        return false;
    }

    match (a, b) {
        (FormValue::Bool(x), FormValue::Bool(y)) => x == y,
        (FormValue::Number(x), FormValue::Number(y)) => x == y,
        (FormValue::String(x), FormValue::String(y)) => x == y,
        (FormValue::Date(x), FormValue::Date(y)) => x.timestamp_millis() == y.timestamp_millis(),
        (FormValue::Array(x), FormValue::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| deep_equal(l, r))
        }
        (FormValue::Object(x), FormValue::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| deep_equal(l, r)))
        }
        // array vs object, date vs object, date vs array
        _ => false,
    }
}
