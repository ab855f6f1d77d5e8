//! Persistence Errors

/// Errors raised by the access objects
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Insert collided with a unique constraint
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PersistenceError {
    /// Classify an error returned by an INSERT
    pub fn from_insert(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                PersistenceError::UniqueViolation(db_err.message().to_string())
            }
            other => PersistenceError::Database(other),
        }
    }
}
