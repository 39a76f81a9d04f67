//! Inbound frame validation rules.

use eventhub_core::error::AppError;

/// Maximum accepted frame size in bytes.
pub const MAX_FRAME_SIZE: usize = 65_536;

/// Validate a raw inbound frame before parsing.
pub fn validate_inbound(raw: &str) -> Result<(), AppError> {
    if raw.len() > MAX_FRAME_SIZE {
        return Err(AppError::serialization(format!(
            "Frame exceeds maximum size of {MAX_FRAME_SIZE} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::serialization("Empty frame"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert!(validate_inbound("  ").is_err());
        assert!(validate_inbound(&"x".repeat(MAX_FRAME_SIZE + 1)).is_err());
        assert!(validate_inbound(r#"{"event":"connect"}"#).is_ok());
    }
}
