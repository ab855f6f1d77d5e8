//! Transaction records
//!
//! A transaction is a stored fact about money moving between two accounts.
//! Nothing here checks that either account exists; sender and receiver ids
//! are taken as given.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_non_blank, DomainError};

/// A stored transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Storage-assigned id
    pub id: i64,
    /// Business identifier used for lookups (unique)
    pub transaction_id: String,
    pub sender_account_id: String,
    pub receiver_account_id: String,
    pub transaction_amount: Decimal,
    pub transaction_type: String,
    pub timestamp: DateTime<Utc>,
    pub transaction_status: String,
    pub fraud_flag: bool,
    pub geolocation: Option<String>,
    pub device_user: Option<String>,
}

/// Data required to record a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionCommand {
    /// Generated when omitted
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub sender_account_id: String,
    pub receiver_account_id: String,
    pub transaction_amount: Decimal,
    pub transaction_type: String,
    pub timestamp: DateTime<Utc>,
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_flag: bool,
    #[serde(default)]
    pub geolocation: Option<String>,
    #[serde(default)]
    pub device_user: Option<String>,
}

/// A validated transaction that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub transaction_id: String,
    pub sender_account_id: String,
    pub receiver_account_id: String,
    pub transaction_amount: Decimal,
    pub transaction_type: String,
    pub timestamp: DateTime<Utc>,
    pub transaction_status: String,
    pub fraud_flag: bool,
    pub geolocation: Option<String>,
    pub device_user: Option<String>,
}

impl CreateTransactionCommand {
    pub fn new(
        sender_account_id: impl Into<String>,
        receiver_account_id: impl Into<String>,
        transaction_amount: Decimal,
        transaction_type: impl Into<String>,
        transaction_status: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: None,
            sender_account_id: sender_account_id.into(),
            receiver_account_id: receiver_account_id.into(),
            transaction_amount,
            transaction_type: transaction_type.into(),
            timestamp: Utc::now(),
            transaction_status: transaction_status.into(),
            fraud_flag: false,
            geolocation: None,
            device_user: None,
        }
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn with_fraud_flag(mut self, fraud_flag: bool) -> Self {
        self.fraud_flag = fraud_flag;
        self
    }

    pub fn with_geolocation(mut self, geolocation: impl Into<String>) -> Self {
        self.geolocation = Some(geolocation.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(ref transaction_id) = self.transaction_id {
            require_non_blank("transaction_id", transaction_id)?;
        }
        require_non_blank("sender_account_id", &self.sender_account_id)?;
        require_non_blank("receiver_account_id", &self.receiver_account_id)?;
        require_non_blank("transaction_type", &self.transaction_type)?;
        require_non_blank("transaction_status", &self.transaction_status)?;

        if self.transaction_amount <= Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "transaction_amount must be positive (got {})",
                self.transaction_amount
            )));
        }

        Ok(())
    }

    /// Build the record to persist, assigning a business id when missing
    pub fn into_new_transaction(self) -> NewTransaction {
        NewTransaction {
            transaction_id: self
                .transaction_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            sender_account_id: self.sender_account_id,
            receiver_account_id: self.receiver_account_id,
            transaction_amount: self.transaction_amount,
            transaction_type: self.transaction_type,
            timestamp: self.timestamp,
            transaction_status: self.transaction_status,
            fraud_flag: self.fraud_flag,
            geolocation: self.geolocation,
            device_user: self.device_user,
        }
    }
}
