//! User access object

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::db::DbConnection;
use crate::domain::User;

use super::PersistenceError;

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            hashed_password: row.try_get("hashed_password")?,
        })
    }
}

/// Reads and writes the `users` table
#[derive(Debug, Clone, Copy, Default)]
pub struct UserCrud;

impl UserCrud {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_all(&self, session: &mut DbConnection) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, username, hashed_password FROM users ORDER BY id")
            .fetch_all(&mut *session)
            .await
    }

    pub async fn get_by_username(
        &self,
        username: &str,
        session: &mut DbConnection,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, hashed_password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&mut *session)
        .await
    }

    /// Insert a user whose password has already been hashed
    pub async fn add(
        &self,
        username: &str,
        hashed_password: &str,
        session: &mut DbConnection,
    ) -> Result<User, PersistenceError> {
        let result = sqlx::query("INSERT INTO users (username, hashed_password) VALUES ($1, $2)")
            .bind(username)
            .bind(hashed_password)
            .execute(&mut *session)
            .await
            .map_err(PersistenceError::from_insert)?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            hashed_password: hashed_password.to_string(),
        })
    }
}
