//! Path identifier parsing

use uuid::Uuid;

use super::ValidationError;

/// Parse a path-supplied identifier.
///
/// Empty input is a missing field; anything that isn't a UUID is an
/// invalid identifier. Neither case reaches storage.
pub fn parse_identifier(field: &'static str, raw: &str) -> Result<Uuid, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Required { field });
    }

    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidIdentifier { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hyphenated_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_identifier("post id", &id.to_string()).unwrap(), id);
    }

    #[test]
    fn empty_is_required() {
        let err = parse_identifier("post id", "").unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "post id" });
        assert_eq!(err.to_string(), "post id is required");
    }

    #[test]
    fn malformed_is_invalid() {
        for raw in ["not-a-valid-id", "123", "65a1f0c2e4b0a1b2c3d4e5f6"] {
            let err = parse_identifier("post id", raw).unwrap_err();
            assert_eq!(err, ValidationError::InvalidIdentifier { field: "post id" });
        }
    }
}
