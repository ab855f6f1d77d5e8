//! Database module
//!
//! Connection pool setup and the startup schema bootstrap.

use std::collections::HashSet;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};

/// Pool shared by the whole process
pub type DbPool = SqlitePool;

/// A single connection; what services and access objects work against
pub type DbConnection = SqliteConnection;

/// A table the service needs, with the DDL that creates it
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub ddl: &'static str,
}

/// Every table the service owns
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "accounts",
        ddl: r#"
            CREATE TABLE accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                middle_name TEXT,
                risk TEXT NOT NULL
            )
        "#,
    },
    TableDef {
        name: "transactions",
        ddl: r#"
            CREATE TABLE transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                transaction_id TEXT NOT NULL UNIQUE,
                sender_account_id TEXT NOT NULL,
                receiver_account_id TEXT NOT NULL,
                transaction_amount TEXT NOT NULL,
                transaction_type TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                transaction_status TEXT NOT NULL,
                fraud_flag BOOLEAN NOT NULL DEFAULT 0,
                geolocation TEXT,
                device_user TEXT
            )
        "#,
    },
    TableDef {
        name: "users",
        ddl: r#"
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                hashed_password TEXT NOT NULL
            )
        "#,
    },
    TableDef {
        name: "sessions",
        ddl: r#"
            CREATE TABLE sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token_hash TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )
        "#,
    },
];

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Open the connection pool.
///
/// The database file is created if missing. An in-memory database lives
/// only as long as its connection, so it gets exactly one that never expires.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    pool_options.connect_with(options).await
}

/// Simple connectivity check
pub async fn verify_connection(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Names of the user tables currently present
pub async fn existing_tables(conn: &mut DbConnection) -> Result<HashSet<String>, sqlx::Error> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(names.into_iter().collect())
}

/// Create whichever required tables are missing.
///
/// Existing tables are never dropped or altered. Returns the names of the
/// tables created, which is empty once the schema is complete.
pub async fn create_tables(pool: &DbPool) -> Result<Vec<&'static str>, sqlx::Error> {
    tracing::info!("Checking database tables");

    let mut tx = pool.begin().await?;
    let existing = existing_tables(&mut tx).await?;

    let missing: Vec<&TableDef> = TABLES
        .iter()
        .filter(|table| !existing.contains(table.name))
        .collect();

    if missing.is_empty() {
        tracing::debug!("Tables already exist");
        tx.commit().await?;
        return Ok(Vec::new());
    }

    let names: Vec<&'static str> = missing.iter().map(|table| table.name).collect();
    tracing::info!(tables = ?names, "Creating missing tables");

    for table in &missing {
        sqlx::query(table.ddl).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    Ok(names)
}

/// Check if required tables exist
pub async fn check_schema(pool: &DbPool) -> Result<bool, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let existing = existing_tables(&mut conn).await?;

    let mut complete = true;
    for table in TABLES {
        if !existing.contains(table.name) {
            tracing::error!("Required table '{}' does not exist", table.name);
            complete = false;
        }
    }

    Ok(complete)
}

/// Fresh in-memory database with the full schema
#[cfg(test)]
pub(crate) async fn test_pool() -> DbPool {
    let pool = connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    create_tables(&pool).await.expect("Failed to create tables");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_creates_all_tables() {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        assert!(!check_schema(&pool).await.unwrap());

        let created = create_tables(&pool).await.unwrap();
        assert_eq!(created, vec!["accounts", "transactions", "users", "sessions"]);
        assert!(check_schema(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent_and_keeps_data() {
        let pool = test_pool().await;

        sqlx::query(
            "INSERT INTO accounts (account_id, first_name, last_name, risk) \
             VALUES ('ACC-1', 'A', 'B', 'low')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let created = create_tables(&pool).await.unwrap();
        assert!(created.is_empty());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_bootstrap_creates_only_missing_tables() {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        sqlx::query(TABLES[2].ddl).execute(&pool).await.unwrap();

        let created = create_tables(&pool).await.unwrap();
        assert_eq!(created, vec!["accounts", "transactions", "sessions"]);
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:test?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://data/records.db"));
    }

    #[tokio::test]
    async fn test_verify_connection() {
        let pool = test_pool().await;
        assert!(verify_connection(&pool).await.is_ok());
    }
}
