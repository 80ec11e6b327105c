//! Validation Error Types

use thiserror::Error;

/// Errors raised by the feature validation pass.
///
/// Both variants are contract violations surfaced to the caller; values are
/// never silently clamped or coerced into range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field was absent after defaulting
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// A normalized field left its declared range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl ValidationError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::OutOfRange { field, .. } => field,
        }
    }
}
