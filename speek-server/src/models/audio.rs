//! Audio payload validation
//!
//! The payload is an opaque reference (URI or encoded clip). It is never
//! decoded or inspected beyond presence and size.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for an audio payload reference (1 MiB)
pub const MAX_AUDIO_LEN: usize = 1024 * 1024;

/// Validated, non-empty audio payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Audio(String);

impl Audio {
    /// Create a new audio payload.
    ///
    /// # Rules
    /// - Required: empty or absent is rejected
    /// - Max 1 MiB
    ///
    /// # Example
    /// ```
    /// use speek_server::models::Audio;
    ///
    /// assert!(Audio::new(Some("clip1")).is_ok());
    /// assert!(Audio::new(Some("")).is_err());
    /// assert!(Audio::new(None).is_err());
    /// ```
    pub fn new(s: Option<&str>) -> Result<Self, ValidationError> {
        let s = match s {
            Some(s) if !s.is_empty() => s,
            _ => return Err(ValidationError::Required { field: "audio" }),
        };

        if s.len() > MAX_AUDIO_LEN {
            return Err(ValidationError::TooLong {
                field: "audio",
                max: MAX_AUDIO_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the payload as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Audio {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
