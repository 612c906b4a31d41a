//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised while validating an inbound chat request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    MissingField { field: String },

    #[error("Field '{field}' must be a string")]
    NotAString { field: String },
}

impl ValidationError {
    /// Creates a missing field validation error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField {
            field: field.into(),
        }
    }

    /// Creates a wrong type validation error.
    pub fn not_a_string(field: impl Into<String>) -> Self {
        ValidationError::NotAString {
            field: field.into(),
        }
    }
}
