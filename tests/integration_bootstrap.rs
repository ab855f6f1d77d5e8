//! Schema bootstrap integration tests

use transaction_service::db;

#[tokio::test]
async fn test_bootstrap_twice_is_noop() {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();

    let first = db::create_tables(&pool).await.unwrap();
    assert_eq!(first.len(), db::TABLES.len());

    sqlx::query("INSERT INTO users (username, hashed_password) VALUES ('alice', 'x')")
        .execute(&pool)
        .await
        .unwrap();

    let second = db::create_tables(&pool).await.unwrap();
    assert!(second.is_empty());
    assert!(db::check_schema(&pool).await.unwrap());

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
}
