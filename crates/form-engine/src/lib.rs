//! Form Engine
//!
//! Stateless transformations between an edited form and what gets sent to
//! the server.
//!
//! # Core Operations
//!
//! - **Diff**: [`has_form_changed`] and [`extract_changed_values`] compare a
//!   form against its original values
//! - **Prune**: [`remove_empty_values`] drops fields that carry no input
//! - **Submit**: [`prepare_form_data_for_submission`] composes both into a
//!   minimal PATCH-style body
//! - **Map**: [`transform_form_data`] reshapes trees through a
//!   [`FieldMapping`] table
//! - **Validate**: [`validate_form_field`] normalizes a caller-supplied
//!   validator's verdict
//!
//! # Architecture
//!
//! ```text
//! current ──┐
//!           ├─→ has_form_changed ─→ extract_changed_values ─→ remove_empty_values ─→ payload
//! defaults ─┘
//!
//! flat form ─→ FieldMapping ─→ nested wire model   (invert() for the way back)
//! ```
//!
//! No function mutates its inputs; every result is a fresh tree.
//!
//! # Example
//!
//! ```rust
//! use form_engine::prelude::*;
//! use serde_json::json;
//!
//! let defaults = FormValue::from(json!({"name": "Test", "address": {"city": "New York", "zip": "10001"}}));
//! let current = FormValue::from(json!({"name": "Test", "address": {"city": "Boston", "zip": "10001"}}));
//!
//! let payload = SubmissionPayload::prepare(&current, &defaults);
//! assert_eq!(payload.to_json_string().unwrap(), r#"{"address":{"city":"Boston"}}"#);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod changes;
pub mod error;
pub mod mapping;
pub mod prune;
pub mod submission;
pub mod validate;

// Re-exports for convenience
pub use changes::{extract_changed_values, has_form_changed};
pub use error::{EngineError, MappingError};
pub use mapping::{transform_form_data, transform_json, FieldMapping};
pub use prune::remove_empty_values;
pub use submission::{prepare_form_data_for_submission, SubmissionPayload};
pub use validate::{
    try_validate_form_field, validate_fields, validate_form_field, FieldValidation,
    FieldValidator, Verdict, INVALID_VALUE_MESSAGE,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with form values and submissions
    pub use crate::changes::{extract_changed_values, has_form_changed};
    pub use crate::mapping::{transform_form_data, FieldMapping};
    pub use crate::prune::remove_empty_values;
    pub use crate::submission::{prepare_form_data_for_submission, SubmissionPayload};
    pub use crate::validate::{validate_form_field, FieldValidation, Verdict};
    pub use form_value::{
        deep_clone, deep_equal, get_nested_value, is_empty, set_nested_value, FieldPath,
        FormValue,
    };
}
