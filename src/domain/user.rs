//! Users

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{require_non_blank, DomainError};

/// Longest accepted username
pub const MAX_USERNAME_LEN: usize = 64;

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 8;

/// A registered user. The password hash never leaves the service.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("hashed_password", &"[REDACTED]")
            .finish()
    }
}

/// Registration input
#[derive(Clone, Deserialize)]
pub struct RegisterUserCommand {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RegisterUserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUserCommand")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl RegisterUserCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_blank("username", &self.username)?;
        if self.username.chars().count() > MAX_USERNAME_LEN {
            return Err(DomainError::InvalidInput(format!(
                "username must be at most {} characters",
                MAX_USERNAME_LEN
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}
