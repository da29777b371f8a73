//! Error types for the recset crate.

use thiserror::Error;

/// Errors that can occur when loading collections or resolving queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A term referenced a field the record under evaluation does not have.
    #[error("field not found: {field}")]
    FieldNotFound { field: String },

    /// A term did not match any shape the evaluator knows how to apply.
    #[error("unsupported term shape: {shape}")]
    UnsupportedTermShape { shape: String },

    /// A group-by field held a nested value, which cannot become a key.
    #[error("field '{field}' holds a nested value and cannot be used as a group key")]
    InvalidGroupKey { field: String },

    /// A plain value could not be turned into a collection.
    #[error("expected an array or object, got {actual}")]
    NotAContainer { actual: &'static str },

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl QueryError {
    pub(crate) fn field_not_found(field: &str) -> Self {
        QueryError::FieldNotFound {
            field: field.to_string(),
        }
    }

    pub(crate) fn unsupported(shape: impl std::fmt::Display) -> Self {
        QueryError::UnsupportedTermShape {
            shape: shape.to_string(),
        }
    }
}

/// Result type for recset operations.
pub type Result<T> = std::result::Result<T, QueryError>;
