//! Field validation normalization
//!
//! Validators are opaque, caller-supplied predicates. This module only
//! turns whatever they return into a uniform [`FieldValidation`]. A
//! validator that panics or returns an error is never intercepted.

use form_value::{FieldPath, FormValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Message used when a validator rejects a value without saying why
pub const INVALID_VALUE_MESSAGE: &str = "Invalid value";

static UNDEFINED: FormValue = FormValue::Undefined;

/// Outcome reported by a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Value accepted
    Pass,
    /// Value rejected without a message
    Fail,
    /// Value rejected with a message
    Message(String),
}

impl From<bool> for Verdict {
    fn from(valid: bool) -> Self {
        if valid {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl From<&str> for Verdict {
    fn from(message: &str) -> Self {
        Self::Message(message.to_owned())
    }
}

impl From<String> for Verdict {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

/// `None` means no complaint
impl From<Option<String>> for Verdict {
    fn from(message: Option<String>) -> Self {
        message.map_or(Self::Pass, Self::Message)
    }
}

/// Only `true` passes; a string is a message; anything else fails
impl From<FormValue> for Verdict {
    fn from(value: FormValue) -> Self {
        match value {
            FormValue::Bool(true) => Self::Pass,
            FormValue::String(message) => Self::Message(message),
            _ => Self::Fail,
        }
    }
}

/// Normalized validation result
///
/// Serializes as `{"valid": true}` or `{"valid": false, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidation {
    /// Whether the value was accepted
    pub valid: bool,
    /// Why the value was rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldValidation {
    /// Accepted value
    #[inline]
    #[must_use]
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// Rejected value
    #[inline]
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Check if accepted
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Rejection message
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<Verdict> for FieldValidation {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass => Self::valid(),
            Verdict::Fail => Self::invalid(INVALID_VALUE_MESSAGE),
            Verdict::Message(message) => Self::invalid(message),
        }
    }
}

/// Validate one field value
///
/// The validator is called exactly once with `value` as given.
/// - `true` → `{valid: true}`
/// - a string (even empty) → `{valid: false, message}`
/// - anything else → `{valid: false, message: "Invalid value"}`
///
/// # Examples
/// ```
/// # use form_engine::{validate_form_field, FieldValidation};
/// # use form_value::FormValue;
/// let email = FormValue::from("nobody");
/// let result = validate_form_field(&email, |v| v.as_str().is_some_and(|s| s.contains('@')));
/// assert_eq!(result, FieldValidation::invalid("Invalid value"));
///
/// let result = validate_form_field(&email, |_| "Enter an email address");
/// assert_eq!(result.message(), Some("Enter an email address"));
/// ```
pub fn validate_form_field<F, R>(value: &FormValue, validator: F) -> FieldValidation
where
    F: FnOnce(&FormValue) -> R,
    R: Into<Verdict>,
{
    let validation = FieldValidation::from(validator(value).into());
    if !validation.valid {
        tracing::debug!(message = ?validation.message, "field rejected");
    }
    validation
}

/// Validate one field value with a fallible validator
///
/// # Errors
/// Returns the validator's own error, unchanged
pub fn try_validate_form_field<F, R, E>(value: &FormValue, validator: F) -> Result<FieldValidation, E>
where
    F: FnOnce(&FormValue) -> Result<R, E>,
    R: Into<Verdict>,
{
    let verdict = validator(value)?;
    Ok(validate_form_field(value, |_| verdict))
}

/// A reusable field validator
///
/// Implemented for every `Fn(&FormValue) -> R` where `R: Into<Verdict>`.
pub trait FieldValidator {
    /// Judge a value
    fn validate(&self, value: &FormValue) -> Verdict;
}

impl<F, R> FieldValidator for F
where
    F: Fn(&FormValue) -> R,
    R: Into<Verdict>,
{
    fn validate(&self, value: &FormValue) -> Verdict {
        self(value).into()
    }
}

/// Validate several fields of a form
///
/// Each validator receives the value at its path (`undefined` when the path
/// does not resolve). Results keep the order of `validators`.
pub fn validate_fields<'a, V>(
    form_data: &FormValue,
    validators: impl IntoIterator<Item = (&'a FieldPath, &'a V)>,
) -> IndexMap<FieldPath, FieldValidation>
where
    V: FieldValidator + ?Sized + 'a,
{
    validators
        .into_iter()
        .map(|(path, validator)| {
            let value = path.get(form_data).unwrap_or(&UNDEFINED);
            let validation = validate_form_field(value, |v| validator.validate(v));
            (path.clone(), validation)
        })
        .collect()
}
