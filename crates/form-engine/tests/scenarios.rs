//! Functional tests for the submit and reshape flows.
//!
//! Core guarantees exercised here:
//! - An untouched form produces no submission at all.
//! - A submission carries only what changed, minus fields the user blanked.
//! - Path access reads through arrays and falls back to defaults.
//! - Mapping tables reshape flat forms into nested payloads and back.

use form_engine::prelude::*;
use form_engine::{FieldValidation, INVALID_VALUE_MESSAGE};
use form_test_utils::{fv, init_tracing, org_settings_defaults, org_settings_edited};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Tenet: comparing a form with identical defaults reports no change.
#[test]
fn identical_form_is_unchanged() {
    let form = fv(json!({"name": "Test", "age": 30}));
    let defaults = fv(json!({"name": "Test", "age": 30}));
    assert!(!has_form_changed(&form, &defaults));
}

/// Tenet: a nested edit is reported as the smallest subtree containing it.
#[test]
fn nested_edit_extracts_only_the_leaf() {
    let current = fv(json!({"name": "Test", "address": {"city": "Boston", "zip": "10001"}}));
    let defaults = fv(json!({"name": "Test", "address": {"city": "New York", "zip": "10001"}}));
    assert_eq!(
        extract_changed_values(&current, &defaults),
        fv(json!({"address": {"city": "Boston"}}))
    );
}

/// Tenet: blanked fields never reach the payload, even when they changed.
#[test]
fn submission_drops_blanked_fields() {
    let form = fv(json!({"name": "Changed", "description": "", "age": 30}));
    let defaults = fv(json!({"name": "Test", "description": "Original", "age": 30}));
    assert_eq!(
        prepare_form_data_for_submission(&form, &defaults),
        fv(json!({"name": "Changed"}))
    );
}

/// Tenet: dotted paths index arrays and fall back to the caller's default.
#[test]
fn path_reads_through_arrays_and_defaults() {
    let tree = fv(json!({"users": [{"name": "John"}, {"name": "Jane"}]}));
    assert_eq!(get_nested_value(&tree, "users.0.name", None), &fv(json!("John")));

    let fallback = fv(json!("Default"));
    assert_eq!(get_nested_value(&fv(json!({})), "user.name", Some(&fallback)), &fallback);
}

/// Tenet: writing a deep path creates the missing objects and leaves the
/// original alone.
#[test]
fn path_write_creates_objects() {
    let tree = fv(json!({"user": {}}));
    let updated = set_nested_value(&tree, "user.profile.name", fv(json!("John")));
    assert_eq!(updated, fv(json!({"user": {"profile": {"name": "John"}}})));
    assert_eq!(tree, fv(json!({"user": {}})));
}

/// Tenet: mapping entries whose source is absent are skipped.
#[test]
fn mapping_skips_absent_sources() {
    let mapping: FieldMapping = [("firstName", "user.firstName"), ("email", "contact.email")]
        .into_iter()
        .collect();
    assert_eq!(
        transform_form_data(&fv(json!({"firstName": "John"})), &mapping),
        fv(json!({"user": {"firstName": "John"}}))
    );
}

/// Tenet: a realistic settings edit produces a minimal PATCH body.
///
/// Cleared description is dropped, `seats: 0` and `sso: true` survive, the
/// edited domain list is replaced whole (minus the blank entry) and the
/// untouched contact list is absent.
#[test]
fn org_settings_patch_is_minimal() {
    init_tracing();
    let payload = SubmissionPayload::prepare(&org_settings_edited(), &org_settings_defaults());

    assert_eq!(
        payload.value(),
        &fv(json!({
            "name": "Acme Corporation",
            "seats": 0,
            "billing": {"address": {"city": "Boston"}},
            "features": {"sso": true},
            "allowedDomains": ["acme.io", "acme.dev"],
            "timezone": "America/New_York"
        }))
    );
    assert_eq!(
        payload.to_json_string().unwrap(),
        r#"{"name":"Acme Corporation","seats":0,"billing":{"address":{"city":"Boston"}},"features":{"sso":true},"allowedDomains":["acme.io","acme.dev"],"timezone":"America/New_York"}"#
    );
}

/// Tenet: submitting leaves both snapshots exactly as they were.
#[test]
fn submission_never_mutates_inputs() {
    let form = org_settings_edited();
    let defaults = org_settings_defaults();
    let _ = prepare_form_data_for_submission(&form, &defaults);
    assert_eq!(form, org_settings_edited());
    assert_eq!(defaults, org_settings_defaults());
}

/// Tenet: a table loaded from configuration reshapes a flat form into the
/// wire model, and its inverse brings the wire model back.
#[test]
fn mapping_table_roundtrip_between_models() {
    let mapping = FieldMapping::from_yaml_str(
        "orgName: organization.name\n\
         billingEmail: organization.billing.email\n\
         city: organization.billing.address.city\n",
    )
    .unwrap();

    let flat = fv(json!({"orgName": "Acme", "billingEmail": "b@acme.io", "city": "Oslo"}));
    let nested = mapping.apply(&flat);
    assert_eq!(
        nested,
        fv(json!({
            "organization": {
                "name": "Acme",
                "billing": {"email": "b@acme.io", "address": {"city": "Oslo"}}
            }
        }))
    );
    assert_eq!(mapping.invert().apply(&nested), flat);
}

/// Tenet: mapping then diffing sends only the reshaped changes.
#[test]
fn reshape_then_submit() {
    let mapping: FieldMapping = [("orgName", "organization.name"), ("plan", "organization.plan")]
        .into_iter()
        .collect();
    let original = mapping.apply(&fv(json!({"orgName": "Acme", "plan": "team"})));
    let edited = mapping.apply(&fv(json!({"orgName": "Acme", "plan": "enterprise"})));

    assert_eq!(
        prepare_form_data_for_submission(&edited, &original),
        fv(json!({"organization": {"plan": "enterprise"}}))
    );
}

/// Tenet: validators are normalized to `{valid, message?}`.
#[test]
fn field_validation_normalizes_verdicts() {
    let slug = fv(json!("Acme Corp"));
    let no_spaces = |v: &FormValue| {
        if v.as_str().is_some_and(|s| s.contains(' ')) {
            Some("Slug cannot contain spaces".to_owned())
        } else {
            None
        }
    };

    assert_eq!(
        validate_form_field(&slug, no_spaces),
        FieldValidation::invalid("Slug cannot contain spaces")
    );
    assert_eq!(
        validate_form_field(&fv(json!("acme")), no_spaces),
        FieldValidation::valid()
    );
    assert_eq!(
        validate_form_field(&FormValue::Null, |v| !v.is_null()),
        FieldValidation::invalid(INVALID_VALUE_MESSAGE)
    );
}
