//! API module
//!
//! HTTP endpoints, middleware and per-request plumbing.

pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use routes::create_router;
pub use session::{CurrentUser, DbSession, SESSION_COOKIE_NAME};
pub use state::{AppState, Services};

/// Full application: health check, API routes and tracing
pub fn build_app(state: AppState) -> Router {
    Router::new()
        // Health check (no auth)
        .route("/health", axum::routing::get(health_check))
        .merge(create_router(state))
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
