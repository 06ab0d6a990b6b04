use crate::error::{IdentityError, Result};
use crate::protocol::{CREATION_FAILED_MESSAGE, ErrorBody, IdentityRecord};

/// Parses and validates an identity record returned on a success status.
///
/// The backend must echo a non-empty `deviceId`; anything else is rejected
/// instead of being shown as a blank identity.
pub fn parse_identity_record(bytes: &[u8]) -> Result<IdentityRecord> {
    let record: IdentityRecord = serde_json::from_slice(bytes)
        .map_err(|e| IdentityError::invalid_record(format!("Malformed identity record: {}", e)))?;
    validate_identity_record(&record)?;
    Ok(record)
}

pub fn validate_identity_record(record: &IdentityRecord) -> Result<()> {
    if record.device_id.trim().is_empty() {
        return Err(IdentityError::invalid_record(
            "Identity record has an empty deviceId",
        ));
    }

    Ok(())
}

/// Parses the existence check body, which must be a bare JSON boolean
pub fn parse_exists_flag(bytes: &[u8]) -> Result<bool> {
    serde_json::from_slice::<bool>(bytes).map_err(|e| {
        IdentityError::invalid_record(format!("Existence check did not return a boolean: {}", e))
    })
}

/// Extracts the message a failed creation should surface.
///
/// Falls back to the generic text when the body is empty, not JSON, or has
/// no string `message` field.
pub fn creation_failure_message(bytes: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| CREATION_FAILED_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity_record_valid() {
        let record = parse_identity_record(br#"{"deviceId":"abc123"}"#).unwrap();
        assert_eq!(record.device_id, "abc123");
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_parse_identity_record_rejects_malformed() {
        // Missing field
        assert!(matches!(
            parse_identity_record(br#"{"id":"abc123"}"#),
            Err(IdentityError::InvalidRecord { .. })
        ));

        // Wrong type
        assert!(parse_identity_record(br#"{"deviceId":42}"#).is_err());

        // Empty id
        assert!(parse_identity_record(br#"{"deviceId":""}"#).is_err());

        // Not an object
        assert!(parse_identity_record(b"true").is_err());
    }

    #[test]
    fn test_parse_exists_flag() {
        assert!(parse_exists_flag(b"true").unwrap());
        assert!(!parse_exists_flag(b" false ").unwrap());
        assert!(parse_exists_flag(b"\"yes\"").is_err());
        assert!(parse_exists_flag(b"").is_err());
    }

    #[test]
    fn test_creation_failure_message() {
        assert_eq!(
            creation_failure_message(br#"{"message":"duplicate device"}"#),
            "duplicate device"
        );
        assert_eq!(creation_failure_message(b""), "Creation failed");
        assert_eq!(creation_failure_message(b"<html>oops</html>"), "Creation failed");
        assert_eq!(creation_failure_message(br#"{"error":"x"}"#), "Creation failed");
        assert_eq!(creation_failure_message(br#"{"message":""}"#), "Creation failed");
    }
}
