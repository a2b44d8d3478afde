//! Testing utilities for the form engine workspace
//!
//! Shared fixtures, `proptest` strategies and tracing setup.

#![allow(missing_docs)]

use form_value::FormValue;
use proptest::prelude::*;
use serde_json::json;

/// Latest date the strategies generate (2100-01-01)
const MAX_DATE_MILLIS: i64 = 4_102_444_800_000;

pub fn fv(json: serde_json::Value) -> FormValue {
    FormValue::from(json)
}

/// Install a test subscriber honouring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Organization settings as loaded from the server
pub fn org_settings_defaults() -> FormValue {
    fv(json!({
        "name": "Acme Corp",
        "slug": "acme",
        "description": "Widgets and more",
        "seats": 25,
        "billing": {
            "plan": "team",
            "email": "billing@acme.io",
            "address": {"street": "1 Main St", "city": "New York", "zip": "10001"}
        },
        "features": {"sso": false, "auditLog": true},
        "allowedDomains": ["acme.io", "acme.com"],
        "contacts": [
            {"name": "Ann", "role": "owner"},
            {"name": "Bob", "role": "admin"}
        ]
    }))
}

/// Same settings after a user edited a handful of fields
pub fn org_settings_edited() -> FormValue {
    fv(json!({
        "name": "Acme Corporation",
        "slug": "acme",
        "description": "",
        "seats": 0,
        "billing": {
            "plan": "team",
            "email": "billing@acme.io",
            "address": {"street": "1 Main St", "city": "Boston", "zip": "10001"}
        },
        "features": {"sso": true, "auditLog": true},
        "allowedDomains": ["acme.io", "", "acme.dev"],
        "contacts": [
            {"name": "Ann", "role": "owner"},
            {"name": "Bob", "role": "admin"}
        ],
        "timezone": "America/New_York"
    }))
}

/// Leaf values: undefined, null, booleans, finite numbers, short strings
/// (blank ones included) and dates
pub fn arb_leaf() -> impl Strategy<Value = FormValue> {
    prop_oneof![
        1 => Just(FormValue::Undefined),
        2 => Just(FormValue::Null),
        2 => any::<bool>().prop_map(FormValue::Bool),
        3 => (-1_000i32..1_000).prop_map(FormValue::from),
        1 => prop::num::f64::NORMAL.prop_map(FormValue::Number),
        4 => "[a-c ]{0,4}".prop_map(FormValue::String),
        1 => (0..MAX_DATE_MILLIS).prop_map(|ms| FormValue::date_from_millis(ms).unwrap_or_default()),
    ]
}

/// Short object key
pub fn arb_key() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

/// Arbitrary value tree of bounded depth
pub fn arb_form_value() -> impl Strategy<Value = FormValue> {
    arb_leaf().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(FormValue::Array),
            prop::collection::vec((arb_key(), inner), 0..5)
                .prop_map(|members| members.into_iter().collect::<FormValue>()),
        ]
    })
}

/// Arbitrary value tree with an object at the root
pub fn arb_form_object() -> impl Strategy<Value = FormValue> {
    prop::collection::vec((arb_key(), arb_form_value()), 0..6)
        .prop_map(|members| members.into_iter().collect::<FormValue>())
}

/// Value tree made of objects and leaves only
pub fn arb_object_tree() -> impl Strategy<Value = FormValue> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec((arb_key(), inner), 0..4)
            .prop_map(|members| members.into_iter().collect::<FormValue>())
    })
}

/// Dotted path of one to three short keys
pub fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_key(), 1..4).prop_map(|segments| segments.join("."))
}

/// Path segment that is a key, a small index or an arbitrary (often huge)
/// decimal number
pub fn arb_segment() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_key(),
        2 => (0usize..4).prop_map(|i| i.to_string()),
        1 => any::<u64>().prop_map(|n| n.to_string()),
        1 => Just(usize::MAX.to_string()),
    ]
}

/// Dotted path of one to four segments mixing keys and indices
pub fn arb_index_path() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_segment(), 1..5).prop_map(|segments| segments.join("."))
}

/// Object-rooted tree (arrays included) paired with a path that either
/// resolves to one of its nodes or appends to one of its arrays
pub fn arb_tree_with_path() -> impl Strategy<Value = (FormValue, String)> {
    prop::collection::vec((arb_key(), arb_form_value()), 1..6)
        .prop_map(|members| members.into_iter().collect::<FormValue>())
        .prop_flat_map(|tree| {
            let paths = node_paths(&tree);
            (Just(tree), prop::sample::select(paths))
        })
}

/// Dotted paths of every node below the root, plus one past the end of
/// every array
pub fn node_paths(value: &FormValue) -> Vec<String> {
    fn walk(value: &FormValue, prefix: Option<&str>, out: &mut Vec<String>) {
        let join = |segment: &str| match prefix {
            Some(prefix) => format!("{prefix}.{segment}"),
            None => segment.to_owned(),
        };
        match value {
            FormValue::Object(map) => {
                for (key, child) in map {
                    let path = join(key);
                    out.push(path.clone());
                    walk(child, Some(&path), out);
                }
            }
            FormValue::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    let path = join(&index.to_string());
                    out.push(path.clone());
                    walk(child, Some(&path), out);
                }
                if prefix.is_some() {
                    out.push(join(&items.len().to_string()));
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(value, None, &mut out);
    out
}

/// Check whether a tree holds a key-less object anywhere below its root
pub fn has_hollow_object(value: &FormValue) -> bool {
    let mut children: Box<dyn Iterator<Item = &FormValue>> = match value {
        FormValue::Object(map) => Box::new(map.values()),
        FormValue::Array(items) => Box::new(items.iter()),
        _ => return false,
    };
    children.any(|child| {
        matches!(child, FormValue::Object(map) if map.is_empty()) || has_hollow_object(child)
    })
}
