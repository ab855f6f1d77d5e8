//! Services module
//!
//! Stateless services that sit between the HTTP layer and the access
//! objects. Each call receives the request's database session explicitly.

mod accounts;
mod auth;
mod transactions;

pub use accounts::AccountService;
pub use auth::AuthService;
pub use transactions::TransactionService;
