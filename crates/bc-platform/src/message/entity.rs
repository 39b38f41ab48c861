//! Message Entity
//!
//! The one persisted record of the application. Messages are
//! append-only: created through the save pipeline, never updated or
//! deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared access code gating every submission. Compared after
/// trimming and lowercasing the submitted value.
pub const ACCESS_CODE: &str = "landspeeder";

/// Upper bound on message length, in characters. SMS-gateway bodies
/// get a "BC Racing: " prefix on top of this.
pub const MAX_BODY_CHARS: usize = 70;

/// A persisted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Row id, assigned on persist.
    pub id: i64,

    /// User-submitted text, 1..=70 characters.
    pub body: String,

    /// The gate value as submitted. Stored verbatim - an observable
    /// quirk of the original system, preserved deliberately.
    pub code: String,

    /// Destination addresses, in delivery order. Always assigned by
    /// the system immediately before persist; never caller-supplied.
    pub recipients: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transient form input for a message not yet validated or persisted.
///
/// `recipients` exists so that a caller-supplied value has somewhere
/// to land and be discarded; the save pipeline always overwrites it.
#[derive(Debug, Clone, Default)]
pub struct MessageDraft {
    pub body: String,
    pub code: String,
    pub recipients: Vec<String>,
}

impl MessageDraft {
    pub fn new(body: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            code: code.into(),
            recipients: Vec::new(),
        }
    }
}

/// A single validation violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Body must be between 1 and {MAX_BODY_CHARS} characters")]
    InvalidLength,

    #[error("Incorrect code")]
    InvalidCode,
}

/// Validate a draft's body and code.
///
/// Pure predicate, independent of persistence. Both checks always
/// run and every violation is reported, so the caller sees the full
/// picture in one pass.
pub fn validate(body: &str, code: &str) -> std::result::Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let chars = body.chars().count();
    if chars == 0 || chars > MAX_BODY_CHARS {
        errors.push(ValidationError::InvalidLength);
    }

    if code.trim().to_lowercase() != ACCESS_CODE {
        errors.push(ValidationError::InvalidCode);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_body_and_code_pass() {
        assert!(validate("hello", "landspeeder").is_ok());
    }

    #[test]
    fn code_is_cleaned_before_comparison() {
        assert!(validate("hello", "LandSpeeder  ").is_ok());
        assert!(validate("hello", "  LANDSPEEDER").is_ok());
    }

    #[test]
    fn empty_body_fails_length() {
        let errors = validate("", "landspeeder").unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidLength]);
    }

    #[test]
    fn boundary_lengths() {
        assert!(validate(&"x".repeat(70), "landspeeder").is_ok());
        let errors = validate(&"x".repeat(71), "landspeeder").unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidLength]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 70 multi-byte characters is exactly at the limit.
        assert!(validate(&"é".repeat(70), "landspeeder").is_ok());
    }

    #[test]
    fn wrong_code_fails_regardless_of_body() {
        let errors = validate("hello", "wrong").unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidCode]);
    }

    #[test]
    fn both_violations_are_reported_together() {
        let errors = validate("", "wrong").unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidLength));
        assert!(errors.contains(&ValidationError::InvalidCode));
        assert_eq!(errors.len(), 2);
    }
}
