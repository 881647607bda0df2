//! Validation error types

use std::fmt;

/// Validation error for request input.
///
/// Raised before any repository call; always maps to a client error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty or absent
    Required { field: &'static str },

    /// Path identifier doesn't parse as a UUID
    InvalidIdentifier { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Request body couldn't be decoded
    InvalidBody { reason: String },
}

impl ValidationError {
    /// Name of the offending field, if the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Required { field }
            | Self::InvalidIdentifier { field }
            | Self::TooLong { field, .. } => Some(field),
            Self::InvalidBody { .. } => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::InvalidIdentifier { .. } => write!(f, "invalid identifier"),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} bytes", field, max)
            }
            Self::InvalidBody { reason } => write!(f, "invalid request body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
