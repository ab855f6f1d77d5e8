//! Account records

use serde::{Deserialize, Serialize};

use super::{require_non_blank, DomainError};

/// A financial account. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Business identifier (unique)
    pub account_id: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    /// Risk classification, free-form
    pub risk: String,
}

/// Risk view of a single account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRisk {
    pub account_id: String,
    pub risk: String,
}

/// Data required to open an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountCommand {
    pub account_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub risk: String,
}

impl CreateAccountCommand {
    pub fn new(
        account_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        risk: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            middle_name: None,
            risk: risk.into(),
        }
    }

    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = Some(middle_name.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_blank("account_id", &self.account_id)?;
        require_non_blank("first_name", &self.first_name)?;
        require_non_blank("last_name", &self.last_name)?;
        require_non_blank("risk", &self.risk)?;
        Ok(())
    }

    /// Build the record to persist
    pub fn into_account(self) -> Account {
        Account {
            account_id: self.account_id,
            first_name: self.first_name,
            last_name: self.last_name,
            middle_name: self.middle_name,
            risk: self.risk,
        }
    }
}
