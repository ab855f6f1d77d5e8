//! Transaction Service

use crate::db::DbConnection;
use crate::domain::{CreateTransactionCommand, DomainError, Transaction};
use crate::error::AppResult;
use crate::persistence::{PersistenceError, TransactionCrud};

/// Transaction listing, lookup and creation.
///
/// Sender and receiver accounts are not checked for existence.
#[derive(Debug, Clone, Default)]
pub struct TransactionService {
    crud: TransactionCrud,
}

impl TransactionService {
    pub fn new() -> Self {
        Self {
            crud: TransactionCrud::new(),
        }
    }

    pub async fn get_all_payments(
        &self,
        session: &mut DbConnection,
    ) -> AppResult<Vec<Transaction>> {
        tracing::debug!("Fetching all transactions");
        let payments = self.crud.get_all(session).await?;
        Ok(payments)
    }

    /// Lookup by business `transaction_id`
    pub async fn get_transaction_by_transaction_id(
        &self,
        transaction_id: &str,
        session: &mut DbConnection,
    ) -> AppResult<Option<Transaction>> {
        tracing::debug!(transaction_id = %transaction_id, "Fetching transaction");
        let transaction = self.crud.get_by_transaction_id(transaction_id, session).await?;
        Ok(transaction)
    }

    pub async fn create_transaction(
        &self,
        command: CreateTransactionCommand,
        session: &mut DbConnection,
    ) -> AppResult<Transaction> {
        tracing::info!("Creating transaction");
        command.validate()?;

        let new_transaction = command.into_new_transaction();
        match self.crud.add(new_transaction, session).await {
            Ok(transaction) => {
                tracing::info!(
                    id = transaction.id,
                    transaction_id = %transaction.transaction_id,
                    "Transaction created"
                );
                Ok(transaction)
            }
            Err(PersistenceError::UniqueViolation(message)) => {
                tracing::error!("Transaction creation failed: {}", message);
                Err(DomainError::Duplicate(message).into())
            }
            Err(PersistenceError::Database(e)) => Err(e.into()),
        }
    }
}
