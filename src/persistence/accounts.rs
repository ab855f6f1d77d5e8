//! Account access object

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::db::DbConnection;
use crate::domain::{Account, AccountRisk};

use super::PersistenceError;

impl<'r> FromRow<'r, SqliteRow> for Account {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            account_id: row.try_get("account_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            middle_name: row.try_get("middle_name")?,
            risk: row.try_get("risk")?,
        })
    }
}

/// Reads and writes the `accounts` table
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountCrud;

impl AccountCrud {
    pub fn new() -> Self {
        Self
    }

    /// All accounts in insertion order
    pub async fn get_all(&self, session: &mut DbConnection) -> Result<Vec<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, first_name, last_name, middle_name, risk
            FROM accounts
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *session)
        .await
    }

    pub async fn get_by_account_id(
        &self,
        account_id: &str,
        session: &mut DbConnection,
    ) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, first_name, last_name, middle_name, risk
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&mut *session)
        .await
    }

    /// Risk classification for one account, `None` when it does not exist
    pub async fn get_risk(
        &self,
        account_id: &str,
        session: &mut DbConnection,
    ) -> Result<Option<AccountRisk>, sqlx::Error> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT account_id, risk FROM accounts WHERE account_id = $1")
                .bind(account_id)
                .fetch_optional(&mut *session)
                .await?;

        Ok(row.map(|(account_id, risk)| AccountRisk { account_id, risk }))
    }

    pub async fn add(
        &self,
        account: &Account,
        session: &mut DbConnection,
    ) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (account_id, first_name, last_name, middle_name, risk)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&account.account_id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.middle_name)
        .bind(&account.risk)
        .execute(&mut *session)
        .await
        .map_err(PersistenceError::from_insert)?;

        Ok(())
    }
}
