//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use chrono::Duration;

/// Longest session lifetime accepted from the environment (one year)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue("LOG_FORMAT")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Lifetime of a login session
    pub session_ttl: Duration,

    /// How often expired sessions are purged
    pub session_cleanup_interval_secs: u64,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections =
            non_zero("DATABASE_MAX_CONNECTIONS", parse_var("DATABASE_MAX_CONNECTIONS", "10")?)?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = parse_var("PORT", "8000")?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let session_ttl = session_ttl_from_hours(parse_var("SESSION_TTL_HOURS", "24")?)?;

        let session_cleanup_interval_secs: u64 = non_zero(
            "SESSION_CLEANUP_INTERVAL_SECS",
            parse_var("SESSION_CLEANUP_INTERVAL_SECS", "300")?,
        )?;

        let log_format = env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "text".to_string())
            .parse()?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            session_ttl,
            session_cleanup_interval_secs,
            log_format,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Session cookies carry the `Secure` attribute outside development
    pub fn secure_cookies(&self) -> bool {
        self.is_production()
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name))
}

fn non_zero<T: Default + PartialEq>(name: &'static str, value: T) -> Result<T, ConfigError> {
    if value == T::default() {
        return Err(ConfigError::InvalidValue(name));
    }
    Ok(value)
}

/// Session lifetime must be positive and at most `MAX_SESSION_TTL_HOURS`
fn session_ttl_from_hours(hours: i64) -> Result<Duration, ConfigError> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::InvalidValue("SESSION_TTL_HOURS"));
    }
    Duration::try_hours(hours).ok_or(ConfigError::InvalidValue("SESSION_TTL_HOURS"))
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
