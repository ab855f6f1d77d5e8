//! Shared application state

use std::sync::Arc;

use chrono::Duration;

use crate::config::Config;
use crate::db::DbPool;
use crate::services::{AccountService, AuthService, TransactionService};

/// Service instances built once at startup
#[derive(Debug)]
pub struct Services {
    pub accounts: AccountService,
    pub transactions: TransactionService,
    pub auth: AuthService,
}

impl Services {
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            accounts: AccountService::new(),
            transactions: TransactionService::new(),
            auth: AuthService::new(session_ttl),
        }
    }
}

/// State handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub services: Arc<Services>,
    /// Add `Secure` to session cookies
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(pool: DbPool, services: Services, secure_cookies: bool) -> Self {
        Self {
            pool,
            services: Arc::new(services),
            secure_cookies,
        }
    }

    pub fn from_config(pool: DbPool, config: &Config) -> Self {
        Self::new(
            pool,
            Services::new(config.session_ttl),
            config.secure_cookies(),
        )
    }
}
