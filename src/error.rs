//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use std::fmt;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::security::SecurityError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Challenge sent with every 401
pub const WWW_AUTHENTICATE_CHALLENGE: &str = "Cookie";

/// Why a request could not be tied to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    /// No `auth_session` cookie on the request
    MissingCookie,
    /// Cookie present but unknown or expired
    InvalidSession,
    /// Session points at a user that no longer exists
    UserNotFound,
}

impl fmt::Display for UnauthenticatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnauthenticatedReason::MissingCookie => write!(f, "no session cookie"),
            UnauthenticatedReason::InvalidSession => write!(f, "invalid or expired session"),
            UnauthenticatedReason::UserNotFound => write!(f, "user for session not found"),
        }
    }
}

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Not authenticated: {0}")]
    Unauthenticated(UnauthenticatedReason),

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Security error: {0}")]
    Security(#[from] SecurityError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AccountNotFound(_) | AppError::TransactionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::Database(_) | AppError::Security(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_code, details) = match &self {
            // 400 Bad Request
            AppError::Domain(domain_err) => match domain_err {
                DomainError::Duplicate(msg) => ("duplicate", Some(msg.clone())),
                DomainError::UsernameTaken(username) => ("username_taken", Some(username.clone())),
                DomainError::InvalidInput(msg) => ("invalid_input", Some(msg.clone())),
            },

            // 401 Unauthorized
            AppError::Unauthenticated(reason) => ("not_authenticated", Some(reason.to_string())),
            AppError::InvalidCredentials => ("invalid_credentials", None),

            // 404 Not Found
            AppError::AccountNotFound(id) => ("account_not_found", Some(id.clone())),
            AppError::TransactionNotFound(id) => ("transaction_not_found", Some(id.clone())),

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("database_error", None)
            }
            AppError::Security(e) => {
                tracing::error!("Security error: {}", e);
                ("internal_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("internal_error", None)
            }
        };

        // Server-side failures do not leak their message
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(WWW_AUTHENTICATE_CHALLENGE),
            );
        }
        response
    }
}
