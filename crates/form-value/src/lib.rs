//! Form Value Trees
//!
//! JSON-like value trees with structural comparison and dotted-path access.
//!
//! # Core Concepts
//!
//! - [`FormValue`]: tagged union of undefined, null, primitives, dates,
//!   arrays and insertion-ordered objects
//! - [`deep_equal`] / [`deep_clone`] / [`is_empty`]: object graph utilities
//! - [`FieldPath`]: dot-delimited address of a node
//! - [`get_nested_value`] / [`set_nested_value`]: non-mutating path access
//!
//! # Example
//!
//! ```rust
//! use form_value::{deep_equal, set_nested_value, FormValue};
//! use serde_json::json;
//!
//! let original = FormValue::from(json!({"user": {}}));
//! let updated = set_nested_value(&original, "user.profile.name", "John".into());
//!
//! assert!(deep_equal(&updated, &FormValue::from(json!({"user": {"profile": {"name": "John"}}}))));
//! assert!(deep_equal(&original, &FormValue::from(json!({"user": {}}))));
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
mod error;
pub mod graph;
pub mod path;
mod value;

// Re-exports
pub use error::ValueError;
pub use graph::{deep_clone, deep_equal, is_empty, is_object, is_plain_object};
pub use path::{array_index, get_nested_value, set_nested_value, FieldPath, PATH_SEPARATOR};
pub use value::{FormValue, ObjectMap, ValueKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
