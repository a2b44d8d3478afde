//! Error types for form values
//!
//! Tree operations themselves are total; only the text and date
//! boundaries can fail.

/// Errors when building a [`FormValue`](crate::FormValue) from external input
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// Input is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Input is not valid YAML
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Timestamp could not be parsed
    #[error("invalid date: {0}")]
    InvalidDate(String),
}
