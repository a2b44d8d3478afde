//! Empty value pruning

use form_value::{deep_clone, is_empty, FormValue, ObjectMap};

/// Drop members that carry no user input
///
/// For each member of `tree`:
/// - empty values (see [`is_empty`]) are skipped
/// - objects are pruned recursively and kept, even when nothing survives
/// - arrays lose their empty elements, object elements are pruned, and the
///   member is dropped if no element survives
/// - any other value is kept unchanged
///
/// A nested object whose members were all empty therefore survives as `{}`
/// while an array whose elements were all empty disappears. A non-object
/// `tree` yields `{}`.
#[must_use]
pub fn remove_empty_values(tree: &FormValue) -> FormValue {
    FormValue::Object(prune_members(tree))
}

fn prune_members(tree: &FormValue) -> ObjectMap {
    let Some(members) = tree.as_object() else {
        return ObjectMap::new();
    };

    let mut pruned = ObjectMap::with_capacity(members.len());
    for (key, value) in members {
        if is_empty(value) {
            continue;
        }
        match value {
            FormValue::Object(_) => {
                pruned.insert(key.clone(), FormValue::Object(prune_members(value)));
            }
            FormValue::Array(items) => {
                let kept: Vec<FormValue> = items
                    .iter()
                    .filter(|item| !is_empty(item))
                    .map(|item| match item {
                        FormValue::Object(_) => FormValue::Object(prune_members(item)),
                        other => deep_clone(other),
                    })
                    .collect();
                if !kept.is_empty() {
                    pruned.insert(key.clone(), FormValue::Array(kept));
                }
            }
            other => {
                pruned.insert(key.clone(), deep_clone(other));
            }
        }
    }
    pruned
}
