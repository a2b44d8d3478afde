//! Change extraction
//!
//! Computes the Change Set between an edited form and its original values.
//! A Change Set has the shape of the current form but only holds the
//! subtrees that differ. It expresses additions and modifications only:
//! keys present in the defaults but missing from the current form never
//! appear in it.

use form_value::{deep_clone, deep_equal, FormValue, ObjectMap};

/// Check whether the current form differs from its defaults
///
/// Both sides are cloned before comparison; the clones never change the
/// result.
#[must_use]
pub fn has_form_changed(current: &FormValue, defaults: &FormValue) -> bool {
    let current = deep_clone(current);
    let defaults = deep_clone(defaults);
    !deep_equal(&current, &defaults)
}

/// Extract the members of `current` that differ from `defaults`
///
/// Only keys of `current` are visited, in their order:
/// - both objects: recurse, keep the key if the nested set is non-empty
/// - both arrays: keep the whole current array if any element differs
/// - anything else: keep the current value if it is not deeply equal
///
/// Dates count as leaves here even though [`is_object`](form_value::is_object)
/// reports them as objects, so a changed date is kept whole.
///
/// A non-object `current` yields `{}`.
#[must_use]
pub fn extract_changed_values(current: &FormValue, defaults: &FormValue) -> FormValue {
    FormValue::Object(changed_members(current, defaults))
}

fn changed_members(current: &FormValue, defaults: &FormValue) -> ObjectMap {
    let Some(members) = current.as_object() else {
        return ObjectMap::new();
    };

    let mut changes = ObjectMap::new();
    for (key, value) in members {
        let original = defaults.get(key);
        let changed = match (value, original) {
            (FormValue::Object(_), Some(original @ FormValue::Object(_))) => {
                let nested = changed_members(value, original);
                if !nested.is_empty() {
                    changes.insert(key.clone(), FormValue::Object(nested));
                }
                continue;
            }
            (FormValue::Array(items), Some(FormValue::Array(original_items))) => {
                items.len() != original_items.len()
                    || items
                        .iter()
                        .zip(original_items)
                        .any(|(item, original_item)| !deep_equal(item, original_item))
            }
            (_, Some(original)) => !deep_equal(value, original),
            (_, None) => !value.is_undefined(),
        };

        if changed {
            changes.insert(key.clone(), deep_clone(value));
        }
    }
    changes
}
