//! Auth Service
//!
//! Registration, password authentication and cookie session resolution.
//! All three flows share the user table but are otherwise independent.

use chrono::{Duration, Utc};

use crate::db::DbConnection;
use crate::domain::{DomainError, RegisterUserCommand, Session, User};
use crate::error::{AppError, AppResult, UnauthenticatedReason};
use crate::persistence::{PersistenceError, SessionCrud, UserCrud};
use crate::security::{
    generate_session_token, hash_password, hash_session_token, verify_password,
};

#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserCrud,
    sessions: SessionCrud,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            users: UserCrud::new(),
            sessions: SessionCrud::new(),
            session_ttl,
        }
    }

    /// How long a new session stays valid
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a user, storing only the Argon2 hash of the password
    pub async fn register_new_user(
        &self,
        command: RegisterUserCommand,
        session: &mut DbConnection,
    ) -> AppResult<User> {
        tracing::info!(username = %command.username, "Registering new user");
        command.validate()?;

        if self.users.get_by_username(&command.username, session).await?.is_some() {
            tracing::warn!(username = %command.username, "Username already registered");
            return Err(DomainError::UsernameTaken(command.username).into());
        }

        let hashed_password = hash_password(&command.password)?;
        self.insert_user(command.username, &hashed_password, session).await
    }

    /// Insert step of registration. A unique violation here means a
    /// concurrent registration won after the lookup found nothing.
    async fn insert_user(
        &self,
        username: String,
        hashed_password: &str,
        session: &mut DbConnection,
    ) -> AppResult<User> {
        match self.users.add(&username, hashed_password, session).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "User registered");
                Ok(user)
            }
            Err(PersistenceError::UniqueViolation(_)) => {
                tracing::warn!(username = %username, "Username already registered");
                Err(DomainError::UsernameTaken(username).into())
            }
            Err(PersistenceError::Database(e)) => {
                tracing::error!(username = %username, "Registration failed: {}", e);
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Check a username/password pair.
    ///
    /// Unknown user and wrong password both yield `Ok(None)`. Storage
    /// failures and unreadable hashes are returned as errors.
    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
        session: &mut DbConnection,
    ) -> AppResult<Option<User>> {
        tracing::info!(username = %username, "Authenticating user");

        let user = match self.users.get_by_username(username, session).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(username = %username, "User not found");
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(username = %username, "Authentication failed: {}", e);
                return Err(e.into());
            }
        };

        if !verify_password(password, &user.hashed_password)? {
            tracing::warn!(username = %username, "Incorrect password");
            return Ok(None);
        }

        tracing::info!(username = %username, "Authentication succeeded");
        Ok(Some(user))
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Open a session for `user` and return the cookie token
    pub async fn start_session(
        &self,
        user: &User,
        session: &mut DbConnection,
    ) -> AppResult<String> {
        let token = generate_session_token();
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.session_ttl).ok_or_else(|| {
            AppError::Internal(format!("session lifetime {} overflows", self.session_ttl))
        })?;

        let record = Session {
            token_hash: hash_session_token(&token),
            username: user.username.clone(),
            created_at: now,
            expires_at,
        };

        self.sessions
            .add(&record, session)
            .await
            .map_err(|e| match e {
                PersistenceError::Database(e) => AppError::Database(e),
                PersistenceError::UniqueViolation(msg) => AppError::Internal(msg),
            })?;

        tracing::info!(
            username = %user.username,
            expires_at = %record.expires_at,
            "Session started"
        );
        Ok(token)
    }

    /// Drop the session behind `token`. Returns false if there was none.
    pub async fn end_session(&self, token: &str, session: &mut DbConnection) -> AppResult<bool> {
        let removed = self
            .sessions
            .delete_by_token_hash(&hash_session_token(token), session)
            .await?;

        if removed {
            tracing::info!("Session ended");
        } else {
            tracing::debug!("Logout with unknown session");
        }
        Ok(removed)
    }

    /// Resolve the user behind a session cookie value.
    ///
    /// Checks run in order: cookie present, session known and unexpired,
    /// user still exists. Each failure is a distinct reason.
    pub async fn get_current_user(
        &self,
        cookie: Option<&str>,
        session: &mut DbConnection,
    ) -> AppResult<User> {
        tracing::debug!("Checking current user");

        let token = match cookie {
            Some(token) if !token.is_empty() => token,
            _ => {
                tracing::warn!("No session cookie found");
                return Err(AppError::Unauthenticated(UnauthenticatedReason::MissingCookie));
            }
        };

        let token_hash = hash_session_token(token);
        let record = match self.sessions.get_by_token_hash(&token_hash, session).await? {
            Some(record) if !record.is_expired(Utc::now()) => record,
            Some(_) => {
                self.sessions.delete_by_token_hash(&token_hash, session).await?;
                tracing::warn!("Expired session cookie");
                return Err(AppError::Unauthenticated(UnauthenticatedReason::InvalidSession));
            }
            None => {
                tracing::warn!("Invalid session cookie");
                return Err(AppError::Unauthenticated(UnauthenticatedReason::InvalidSession));
            }
        };

        let user = self
            .users
            .get_by_username(&record.username, session)
            .await?
            .ok_or_else(|| {
                tracing::warn!(username = %record.username, "User not found for session");
                AppError::Unauthenticated(UnauthenticatedReason::UserNotFound)
            })?;

        tracing::debug!(username = %user.username, "Current user resolved");
        Ok(user)
    }
}
