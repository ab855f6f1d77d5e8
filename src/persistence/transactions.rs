//! Transaction access object
//!
//! Amounts are stored as decimal strings so no precision is lost on the
//! way through SQLite.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::db::DbConnection;
use crate::domain::transaction::NewTransaction;
use crate::domain::Transaction;

use super::PersistenceError;

const SELECT_COLUMNS: &str = r#"
    SELECT id, transaction_id, sender_account_id, receiver_account_id,
           transaction_amount, transaction_type, timestamp, transaction_status,
           fraud_flag, geolocation, device_user
    FROM transactions
"#;

impl<'r> FromRow<'r, SqliteRow> for Transaction {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let amount: String = row.try_get("transaction_amount")?;
        let transaction_amount =
            Decimal::from_str(&amount).map_err(|e| sqlx::Error::ColumnDecode {
                index: "transaction_amount".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            transaction_id: row.try_get("transaction_id")?,
            sender_account_id: row.try_get("sender_account_id")?,
            receiver_account_id: row.try_get("receiver_account_id")?,
            transaction_amount,
            transaction_type: row.try_get("transaction_type")?,
            timestamp: row.try_get("timestamp")?,
            transaction_status: row.try_get("transaction_status")?,
            fraud_flag: row.try_get("fraud_flag")?,
            geolocation: row.try_get("geolocation")?,
            device_user: row.try_get("device_user")?,
        })
    }
}

/// Reads and writes the `transactions` table
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionCrud;

impl TransactionCrud {
    pub fn new() -> Self {
        Self
    }

    /// All transactions in insertion order
    pub async fn get_all(
        &self,
        session: &mut DbConnection,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!("{} ORDER BY id", SELECT_COLUMNS);
        sqlx::query_as::<_, Transaction>(&query)
            .fetch_all(&mut *session)
            .await
    }

    /// Lookup by business id, not by storage id
    pub async fn get_by_transaction_id(
        &self,
        transaction_id: &str,
        session: &mut DbConnection,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!("{} WHERE transaction_id = $1", SELECT_COLUMNS);
        sqlx::query_as::<_, Transaction>(&query)
            .bind(transaction_id)
            .fetch_optional(&mut *session)
            .await
    }

    /// Insert a transaction and return it with its storage id
    pub async fn add(
        &self,
        transaction: NewTransaction,
        session: &mut DbConnection,
    ) -> Result<Transaction, PersistenceError> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_id, sender_account_id, receiver_account_id,
                transaction_amount, transaction_type, timestamp, transaction_status,
                fraud_flag, geolocation, device_user
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&transaction.transaction_id)
        .bind(&transaction.sender_account_id)
        .bind(&transaction.receiver_account_id)
        .bind(transaction.transaction_amount.to_string())
        .bind(&transaction.transaction_type)
        .bind(transaction.timestamp)
        .bind(&transaction.transaction_status)
        .bind(transaction.fraud_flag)
        .bind(&transaction.geolocation)
        .bind(&transaction.device_user)
        .execute(&mut *session)
        .await
        .map_err(PersistenceError::from_insert)?;

        Ok(Transaction {
            id: result.last_insert_rowid(),
            transaction_id: transaction.transaction_id,
            sender_account_id: transaction.sender_account_id,
            receiver_account_id: transaction.receiver_account_id,
            transaction_amount: transaction.transaction_amount,
            transaction_type: transaction.transaction_type,
            timestamp: transaction.timestamp,
            transaction_status: transaction.transaction_status,
            fraud_flag: transaction.fraud_flag,
            geolocation: transaction.geolocation,
            device_user: transaction.device_user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::domain::CreateTransactionCommand;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_add_round_trips_amount_and_timestamp() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let crud = TransactionCrud::new();

        let new = CreateTransactionCommand::new(
            "ACC-1",
            "ACC-2",
            dec!(1234.5678),
            "transfer",
            "completed",
        )
        .with_transaction_id("TX-1")
            .with_fraud_flag(true)
            .with_geolocation("59.93,30.33")
            .into_new_transaction();

        let created = crud.add(new.clone(), &mut conn).await.unwrap();
        assert!(created.id > 0);

        let stored = crud
            .get_by_transaction_id("TX-1", &mut conn)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(stored, created);
        assert_eq!(stored.transaction_amount, dec!(1234.5678));
        assert_eq!(stored.timestamp, new.timestamp);
        assert!(stored.fraud_flag);
        assert!(stored.device_user.is_none());
    }

    #[tokio::test]
    async fn test_lookup_uses_business_id() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let crud = TransactionCrud::new();

        let created = crud
            .add(
                CreateTransactionCommand::new("A", "B", dec!(1), "transfer", "pending")
                    .with_transaction_id("TX-BIZ")
                    .into_new_transaction(),
                &mut conn,
            )
            .await
            .unwrap();

        let by_storage_id = crud
            .get_by_transaction_id(&created.id.to_string(), &mut conn)
            .await
            .unwrap();
        assert!(by_storage_id.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_transaction_id() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let crud = TransactionCrud::new();

        let new = CreateTransactionCommand::new("A", "B", dec!(5), "transfer", "pending")
            .with_transaction_id("TX-DUP")
            .into_new_transaction();

        crud.add(new.clone(), &mut conn).await.unwrap();
        let err = crud.add(new, &mut conn).await.unwrap_err();

        assert!(matches!(err, PersistenceError::UniqueViolation(_)));
        assert_eq!(crud.get_all(&mut conn).await.unwrap().len(), 1);
    }
}
