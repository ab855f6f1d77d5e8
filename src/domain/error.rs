//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Failures a caller can act on.
///
/// Storage failures other than uniqueness violations are not represented
/// here; they travel as `sqlx::Error` and end up as a 500.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A record with the same business key already exists
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Registration attempted with a username that is taken
    #[error("Username already registered: {0}")]
    UsernameTaken(String),

    /// Request data failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_carries_message() {
        let err = DomainError::Duplicate(
            "UNIQUE constraint failed: accounts.account_id".to_string(),
        );
        assert!(err.to_string().contains("accounts.account_id"));
    }

    #[test]
    fn test_invalid_input_message() {
        let err = DomainError::InvalidInput("risk must not be blank".to_string());
        assert_eq!(err.to_string(), "Invalid input: risk must not be blank");
    }
}
