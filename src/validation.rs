use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;

pub const DEFAULT_MIN_LENGTH: usize = 10;
pub const DEFAULT_MAX_LENGTH: usize = 5000;

/// Inclusive character-count bounds for a complaint description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for LengthBounds {
    fn default() -> Self {
        LengthBounds {
            min: DEFAULT_MIN_LENGTH,
            max: DEFAULT_MAX_LENGTH,
        }
    }
}

pub fn validate_complaint_text(text: &str, bounds: LengthBounds) -> Result<(), ProcessingError> {
    if text.trim().is_empty() {
        warn!("Empty complaint text received");
        return Err(ProcessingError::InvalidComplaintData(
            "Complaint text is empty".to_string(),
        ));
    }

    let length = text.chars().count();
    if length < bounds.min {
        warn!("Complaint text too short: {} characters", length);
        return Err(ProcessingError::InvalidComplaintData(format!(
            "Complaint text is too short ({length} < {} characters)",
            bounds.min
        )));
    }
    if length > bounds.max {
        warn!("Complaint text exceeds maximum length: {} characters", length);
        return Err(ProcessingError::InvalidComplaintData(format!(
            "Complaint text is too long ({length} > {} characters)",
            bounds.max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_reasonable_text() {
        assert!(
            validate_complaint_text("Streetlight broken on 5th Avenue", LengthBounds::default())
                .is_ok()
        );
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        for text in ["", "   ", "\n\t"] {
            assert!(matches!(
                validate_complaint_text(text, LengthBounds::default()),
                Err(ProcessingError::InvalidComplaintData(_))
            ));
        }
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let bounds = LengthBounds { min: 3, max: 5 };
        assert!(validate_complaint_text("ab", bounds).is_err());
        assert!(validate_complaint_text("abc", bounds).is_ok());
        assert!(validate_complaint_text("abcde", bounds).is_ok());
        assert!(validate_complaint_text("abcdef", bounds).is_err());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let bounds = LengthBounds { min: 1, max: 4 };
        assert!(validate_complaint_text("ñññ", bounds).is_ok());
    }
}
