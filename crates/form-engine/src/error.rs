//! Error types for the form engine
//!
//! The tree transformations never fail. Errors only arise at the text
//! boundaries:
//! - Loading mapping tables (JSON/YAML)
//! - Parsing form snapshots
//! - Encoding submission payloads

use form_value::ValueError;

/// Errors while loading a [`FieldMapping`](crate::FieldMapping) table
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// Table is not valid JSON or not a string-to-string object
    #[error("invalid JSON mapping table: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Table is not valid YAML or not a string-to-string mapping
    #[error("invalid YAML mapping table: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Form snapshot could not be read
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Mapping table could not be read
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Payload could not be encoded
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl EngineError {
    /// Create serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}
