//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, State},
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, AccountRisk, CreateAccountCommand, CreateTransactionCommand, RegisterUserCommand,
    Transaction, User,
};
use crate::error::AppError;

use super::middleware::{logging_middleware, session_auth_middleware};
use super::session::{
    clear_session_cookie, read_cookie, session_cookie, CurrentUser, DbSession, SESSION_COOKIE_NAME,
};
use super::state::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout));

    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/:account_id/risk", get(get_account_risk))
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/:transaction_id", get(get_transaction))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

// =========================================================================
// Auth
// =========================================================================

/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    mut session: DbSession,
    Json(command): Json<RegisterUserCommand>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state
        .services
        .auth
        .register_new_user(command, &mut session)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login: sets the session cookie on success
async fn login(
    State(state): State<AppState>,
    mut session: DbSession,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = &state.services.auth;

    let user = auth
        .authenticate_user(&request.username, &request.password, &mut session)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let token = auth.start_session(&user, &mut session).await?;
    let cookie = session_cookie(&token, auth.session_ttl(), state.secure_cookies);

    Ok(([(header::SET_COOKIE, cookie)], Json(user)))
}

/// POST /auth/logout
async fn logout(
    State(state): State<AppState>,
    mut session: DbSession,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = read_cookie(&headers, SESSION_COOKIE_NAME) {
        state.services.auth.end_session(&token, &mut session).await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies))],
    ))
}

/// GET /auth/me
async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

// =========================================================================
// Accounts
// =========================================================================

/// GET /accounts
async fn list_accounts(
    State(state): State<AppState>,
    mut session: DbSession,
) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = state.services.accounts.get_all_accounts(&mut session).await?;
    Ok(Json(accounts))
}

/// POST /accounts
async fn create_account(
    State(state): State<AppState>,
    mut session: DbSession,
    Json(command): Json<CreateAccountCommand>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state
        .services
        .accounts
        .create_account(command, &mut session)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /accounts/:account_id/risk
async fn get_account_risk(
    State(state): State<AppState>,
    mut session: DbSession,
    Path(account_id): Path<String>,
) -> Result<Json<AccountRisk>, AppError> {
    let risk = state
        .services
        .accounts
        .get_account_risk(&account_id, &mut session)
        .await?
        .ok_or(AppError::AccountNotFound(account_id))?;

    Ok(Json(risk))
}

// =========================================================================
// Transactions
// =========================================================================

/// GET /transactions
async fn list_transactions(
    State(state): State<AppState>,
    mut session: DbSession,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let payments = state.services.transactions.get_all_payments(&mut session).await?;
    Ok(Json(payments))
}

/// POST /transactions
async fn create_transaction(
    State(state): State<AppState>,
    mut session: DbSession,
    Json(command): Json<CreateTransactionCommand>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = state
        .services
        .transactions
        .create_transaction(command, &mut session)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /transactions/:transaction_id
async fn get_transaction(
    State(state): State<AppState>,
    mut session: DbSession,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .services
        .transactions
        .get_transaction_by_transaction_id(&transaction_id, &mut session)
        .await?
        .ok_or(AppError::TransactionNotFound(transaction_id))?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialize() {
        let json = r#"{"username": "alice", "password": "correct-horse"}"#;

        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "alice");
        assert!(!format!("{:?}", request).contains("correct-horse"));
    }

    #[test]
    fn test_create_account_body_deserialize() {
        let json = r#"{
            "account_id": "ACC-7",
            "first_name": "Olga",
            "last_name": "Smirnova",
            "middle_name": "Petrovna",
            "risk": "low"
        }"#;

        let command: CreateAccountCommand = serde_json::from_str(json).unwrap();
        assert_eq!(command.middle_name.as_deref(), Some("Petrovna"));
    }
}
