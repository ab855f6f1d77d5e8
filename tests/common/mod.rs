//! Common test utilities

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tower::util::ServiceExt;

use transaction_service::api::{self, AppState, Services};
use transaction_service::db::{self, DbPool};

pub const PASSWORD: &str = "correct-horse-battery";

/// Fresh in-memory database with the schema bootstrapped, plus the app
pub async fn setup_test_app() -> (Router, DbPool) {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    db::create_tables(&pool).await.expect("Failed to create tables");

    let state = AppState::new(pool.clone(), Services::new(Duration::hours(1)), false);
    (api::build_app(state), pool)
}

/// Response pieces the tests look at
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send a request, optionally with a JSON body and a cookie
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// `name=value` part of a `Set-Cookie` header, ready to send back
pub fn session_cookie_from(headers: &HeaderMap) -> String {
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .expect("Set-Cookie missing")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Register a user, log in and return the cookie to send on later requests
pub async fn register_and_login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        "POST",
        "/auth/register",
        Some(serde_json::json!({ "username": username, "password": PASSWORD })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "registration failed");

    let response = send(
        app,
        "POST",
        "/auth/login",
        Some(serde_json::json!({ "username": username, "password": PASSWORD })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "login failed");

    session_cookie_from(&response.headers)
}
