//! Request-scoped database sessions and the session cookie

use std::ops::{Deref, DerefMut};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use chrono::Duration;
use sqlx::pool::PoolConnection;
use sqlx::Sqlite;

use crate::db::DbConnection;
use crate::domain::User;
use crate::error::AppError;

use super::state::AppState;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "auth_session";

/// One pooled connection for the lifetime of a request.
///
/// The connection goes back to the pool when this is dropped, whichever
/// way the handler exits.
pub struct DbSession(PoolConnection<Sqlite>);

#[async_trait]
impl FromRequestParts<AppState> for DbSession {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        tracing::debug!("Opening database session");
        let conn = state.pool.acquire().await?;
        Ok(DbSession(conn))
    }
}

impl Deref for DbSession {
    type Target = DbConnection;

    fn deref(&self) -> &DbConnection {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut DbConnection {
        &mut self.0
    }
}

/// User resolved from the session cookie, set by `session_auth_middleware`
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Value of a cookie from the request's `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

/// `Set-Cookie` value that installs a session token
pub fn session_cookie(token: &str, max_age: Duration, secure: bool) -> String {
    build_cookie(token, max_age.num_seconds().max(0), secure)
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    build_cookie("", 0, secure)
}

fn build_cookie(value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE_NAME, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_read_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_session=abc123; lang=ru"),
        );

        assert_eq!(read_cookie(&headers, SESSION_COOKIE_NAME), Some("abc123".to_string()));
        assert_eq!(read_cookie(&headers, "lang"), Some("ru".to_string()));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_read_cookie_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("auth_session=xyz"));

        assert_eq!(read_cookie(&headers, SESSION_COOKIE_NAME), Some("xyz".to_string()));
    }

    #[test]
    fn test_read_cookie_requires_exact_name() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_session_old=stale"));

        assert_eq!(read_cookie(&headers, SESSION_COOKIE_NAME), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", Duration::hours(24), false);
        assert_eq!(cookie, "auth_session=tok; HttpOnly; SameSite=Lax; Path=/; Max-Age=86400");

        let secure = session_cookie("tok", Duration::hours(1), true);
        assert!(secure.ends_with("; Secure"));

        let cleared = clear_session_cookie(false);
        assert!(cleared.starts_with("auth_session=;"));
        assert!(cleared.contains("Max-Age=0"));
    }
}
