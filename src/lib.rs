//! Transaction Service Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod jobs;
pub mod persistence;
pub mod security;
pub mod services;

mod error;

pub use config::{Config, LogFormat};
pub use domain::{Account, AccountRisk, DomainError, Transaction, User};
pub use error::{AppError, AppResult, UnauthenticatedReason};
