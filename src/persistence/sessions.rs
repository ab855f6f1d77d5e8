//! Session access object

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::db::DbConnection;
use crate::domain::Session;

use super::PersistenceError;

impl<'r> FromRow<'r, SqliteRow> for Session {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            token_hash: row.try_get("token_hash")?,
            username: row.try_get("username")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }
}

/// Reads and writes the `sessions` table
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCrud;

impl SessionCrud {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_by_token_hash(
        &self,
        token_hash: &str,
        session: &mut DbConnection,
    ) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT token_hash, username, created_at, expires_at
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&mut *session)
        .await
    }

    pub async fn add(
        &self,
        record: &Session,
        session: &mut DbConnection,
    ) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token_hash, username, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.token_hash)
        .bind(&record.username)
        .bind(record.created_at)
        .bind(record.expires_at)
        .execute(&mut *session)
        .await
        .map_err(PersistenceError::from_insert)?;

        Ok(())
    }

    /// Returns true when a row was removed
    pub async fn delete_by_token_hash(
        &self,
        token_hash: &str,
        session: &mut DbConnection,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&mut *session)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every session that expired at or before `now`
    pub async fn delete_expired(
        &self,
        now: DateTime<Utc>,
        session: &mut DbConnection,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&mut *session)
            .await?;

        Ok(result.rows_affected())
    }
}
