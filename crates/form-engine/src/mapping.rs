//! Field mapping between differently-shaped trees
//!
//! A [`FieldMapping`] is an ordered table of source path → target path.
//! [`transform_form_data`] reads every source path from a form and writes
//! the value at the target path of a fresh tree, which is how a flat form
//! model becomes a nested wire model. [`FieldMapping::invert`] gives the
//! table for the opposite direction.

use form_value::{deep_clone, FieldPath, FormValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, MappingError};

/// Ordered source path → target path table
///
/// Serializes as a plain object of dotted strings, e.g.
/// `{"firstName": "user.firstName"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(IndexMap<FieldPath, FieldPath>);

impl FieldMapping {
    /// Create empty mapping
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mapping table from JSON text
    ///
    /// # Errors
    /// Returns error if the text is not a JSON object of strings
    pub fn from_json_str(json: &str) -> Result<Self, MappingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a mapping table from YAML text
    ///
    /// # Errors
    /// Returns error if the text is not a YAML mapping of strings
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MappingError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Add an entry, returning the previous target for `source`
    ///
    /// A re-inserted source keeps its original position.
    pub fn insert(
        &mut self,
        source: impl Into<FieldPath>,
        target: impl Into<FieldPath>,
    ) -> Option<FieldPath> {
        self.0.insert(source.into(), target.into())
    }

    /// Target path for `source`
    #[inline]
    #[must_use]
    pub fn target(&self, source: &FieldPath) -> Option<&FieldPath> {
        self.0.get(source)
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in table order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FieldPath)> {
        self.0.iter()
    }

    /// Table for the opposite direction (target → source)
    ///
    /// When several sources share a target, the later entry wins.
    #[must_use]
    pub fn invert(&self) -> Self {
        let mut inverted = IndexMap::with_capacity(self.0.len());
        for (source, target) in &self.0 {
            inverted.insert(target.clone(), source.clone());
        }
        Self(inverted)
    }

    /// Apply this mapping to `form_data`
    ///
    /// See [`transform_form_data`].
    #[inline]
    #[must_use]
    pub fn apply(&self, form_data: &FormValue) -> FormValue {
        transform_form_data(form_data, self)
    }
}

impl<S, T> FromIterator<(S, T)> for FieldMapping
where
    S: Into<FieldPath>,
    T: Into<FieldPath>,
{
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(source, target)| (source.into(), target.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a FieldMapping {
    type Item = (&'a FieldPath, &'a FieldPath);
    type IntoIter = indexmap::map::Iter<'a, FieldPath, FieldPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Reshape `form_data` through `field_mapping`
///
/// Entries are applied in table order onto a fresh object. A source path
/// that does not resolve (or resolves to `undefined`) skips its entry.
/// Each write lands on the result built so far, so entries targeting the
/// same subtree merge. `form_data` is left untouched.
///
/// # Examples
/// ```
/// # use form_engine::{transform_form_data, FieldMapping};
/// # use form_value::FormValue;
/// # use serde_json::json;
/// let mapping: FieldMapping = [("firstName", "user.firstName"), ("email", "contact.email")]
///     .into_iter()
///     .collect();
/// let form = FormValue::from(json!({"firstName": "John"}));
/// assert_eq!(
///     transform_form_data(&form, &mapping),
///     FormValue::from(json!({"user": {"firstName": "John"}}))
/// );
/// ```
#[must_use]
pub fn transform_form_data(form_data: &FormValue, field_mapping: &FieldMapping) -> FormValue {
    let mut result = FormValue::empty_object();
    for (source, target) in field_mapping {
        let Some(value) = source.get(form_data) else {
            tracing::trace!(%source, %target, "source path absent, mapping skipped");
            continue;
        };
        result = target.set(&result, deep_clone(value));
    }
    result
}

/// Reshape a JSON form document through a JSON mapping table
///
/// # Errors
/// Returns [`EngineError::Value`] if the form is not valid JSON and
/// [`EngineError::Mapping`] if the table is not an object of strings
pub fn transform_json(form_json: &str, mapping_json: &str) -> Result<FormValue, EngineError> {
    let form_data = FormValue::from_json_str(form_json)?;
    let field_mapping = FieldMapping::from_json_str(mapping_json)?;
    Ok(transform_form_data(&form_data, &field_mapping))
}
