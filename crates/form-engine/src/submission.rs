//! Submission preparation
//!
//! Builds the minimal PATCH-style body sent when a form is submitted.

use form_value::FormValue;
use serde::Serialize;

use crate::changes::{extract_changed_values, has_form_changed};
use crate::error::EngineError;
use crate::prune::remove_empty_values;

/// Build the minimal payload for a form submission
///
/// Returns `{}` when nothing changed, otherwise the Change Set against
/// `default_values` with empty members pruned.
///
/// # Examples
/// ```
/// # use form_engine::prepare_form_data_for_submission;
/// # use form_value::FormValue;
/// # use serde_json::json;
/// let form = FormValue::from(json!({"name": "Changed", "description": "", "age": 30}));
/// let defaults = FormValue::from(json!({"name": "Test", "description": "Original", "age": 30}));
/// let payload = prepare_form_data_for_submission(&form, &defaults);
/// assert_eq!(payload, FormValue::from(json!({"name": "Changed"})));
/// ```
#[must_use]
pub fn prepare_form_data_for_submission(form_data: &FormValue, default_values: &FormValue) -> FormValue {
    if !has_form_changed(form_data, default_values) {
        tracing::debug!("form unchanged, empty submission");
        return FormValue::empty_object();
    }

    let changes = extract_changed_values(form_data, default_values);
    let payload = remove_empty_values(&changes);
    tracing::debug!(
        changed = member_count(&changes),
        submitted = member_count(&payload),
        "prepared form submission"
    );
    payload
}

fn member_count(value: &FormValue) -> usize {
    value.as_object().map_or(0, indexmap::IndexMap::len)
}

/// Prepared submission body
///
/// Serializes as the bare payload object, ready to be forwarded as a JSON
/// request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubmissionPayload(FormValue);

impl SubmissionPayload {
    /// Prepare the payload for `form_data` against `default_values`
    #[inline]
    #[must_use]
    pub fn prepare(form_data: &FormValue, default_values: &FormValue) -> Self {
        Self(prepare_form_data_for_submission(form_data, default_values))
    }

    /// Prepare the payload from two JSON documents
    ///
    /// # Errors
    /// Returns error if either document is not valid JSON
    pub fn prepare_json(form_json: &str, defaults_json: &str) -> Result<Self, EngineError> {
        let form_data = FormValue::from_json_str(form_json)?;
        let default_values = FormValue::from_json_str(defaults_json)?;
        Ok(Self::prepare(&form_data, &default_values))
    }

    /// Check if there is nothing to send
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        member_count(&self.0) == 0
    }

    /// Payload value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &FormValue {
        &self.0
    }

    /// Take the payload value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> FormValue {
        self.0
    }

    /// Encode as a JSON request body
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn to_json_string(&self) -> Result<String, EngineError> {
        serde_json::to_string(&self.0).map_err(|e| EngineError::serialization(e.to_string()))
    }
}

impl From<SubmissionPayload> for FormValue {
    fn from(payload: SubmissionPayload) -> Self {
        payload.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v(json: serde_json::Value) -> FormValue {
        FormValue::from(json)
    }

    #[test]
    fn unchanged_form_submits_nothing() {
        let form = v(json!({"name": "Test", "description": "", "tags": []}));
        let payload = prepare_form_data_for_submission(&form, &form.clone());
        assert_eq!(payload, v(json!({})));
    }

    #[test]
    fn cleared_field_is_not_submitted() {
        let form = v(json!({"name": "Changed", "description": "", "age": 30}));
        let defaults = v(json!({"name": "Test", "description": "Original", "age": 30}));
        assert_eq!(
            prepare_form_data_for_submission(&form, &defaults),
            v(json!({"name": "Changed"}))
        );
    }

    #[test]
    fn zero_and_false_edits_are_submitted() {
        let form = v(json!({"limit": 0, "active": false}));
        let defaults = v(json!({"limit": 10, "active": true}));
        assert_eq!(prepare_form_data_for_submission(&form, &defaults), form);
    }

    #[test]
    fn changed_array_is_submitted_without_empty_elements() {
        let form = v(json!({"emails": ["a@x.io", "", "b@x.io"]}));
        let defaults = v(json!({"emails": ["a@x.io"]}));
        assert_eq!(
            prepare_form_data_for_submission(&form, &defaults),
            v(json!({"emails": ["a@x.io", "b@x.io"]}))
        );
    }

    #[test]
    fn payload_wraps_prepared_value() {
        let form = v(json!({"org": {"name": "Acme", "plan": "pro"}}));
        let defaults = v(json!({"org": {"name": "Acme", "plan": "free"}}));
        let payload = SubmissionPayload::prepare(&form, &defaults);

        assert!(!payload.is_empty());
        assert_eq!(payload.to_json_string().unwrap(), r#"{"org":{"plan":"pro"}}"#);
        assert_eq!(payload.into_value(), v(json!({"org": {"plan": "pro"}})));
    }

    #[test]
    fn payload_from_json_documents() {
        let payload = SubmissionPayload::prepare_json(r#"{"a": 1, "b": 2}"#, r#"{"a": 1, "b": 1}"#).unwrap();
        assert_eq!(payload.value(), &v(json!({"b": 2})));

        let unchanged = SubmissionPayload::prepare_json(r#"{"a": 1}"#, r#"{"a": 1}"#).unwrap();
        assert!(unchanged.is_empty());
        assert_eq!(serde_json::to_string(&unchanged).unwrap(), "{}");
    }

    #[test]
    fn payload_from_invalid_json_fails() {
        let result = SubmissionPayload::prepare_json("{", "{}");
        assert!(matches!(result, Err(EngineError::Value(_))));
    }
}
