//! Domain module
//!
//! Record types, creation commands and domain errors.

pub mod account;
pub mod error;
pub mod session;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountRisk, CreateAccountCommand};
pub use error::DomainError;
pub use session::Session;
pub use transaction::{CreateTransactionCommand, Transaction};
pub use user::{RegisterUserCommand, User};

/// Reject empty or whitespace-only values for a required field
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidInput(format!("{} must not be blank", field)));
    }
    Ok(())
}
