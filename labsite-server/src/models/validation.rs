//! Validation error types

use std::fmt;

/// Validation error for submitted form data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required form field was not submitted
    Missing { field: &'static str },

    /// Value doesn't match the required format (e.g., non-numeric id)
    InvalidFormat { field: &'static str, reason: &'static str },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::InvalidFormat { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "missing required field '{}'", field),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
