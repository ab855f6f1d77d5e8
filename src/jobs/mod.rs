//! Scheduled Jobs
//!
//! Background maintenance. The only job purges login sessions whose
//! expiry has passed so the table does not grow without bound.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::interval;

use crate::db::DbPool;
use crate::persistence::SessionCrud;

// =========================================================================
// Expired Session Cleanup Job
// =========================================================================

/// Delete sessions that expired at or before `now`
pub async fn cleanup_expired_sessions(
    pool: &DbPool,
    now: DateTime<Utc>,
) -> Result<u64, JobError> {
    let mut conn = pool.acquire().await?;
    let rows_deleted = SessionCrud::new().delete_expired(now, &mut conn).await?;

    if rows_deleted > 0 {
        tracing::info!(rows_deleted = rows_deleted, "Cleaned up expired sessions");
    }

    Ok(rows_deleted)
}

// =========================================================================
// Job Scheduler
// =========================================================================

/// Configuration for job scheduler
#[derive(Debug, Clone)]
pub struct JobSchedulerConfig {
    /// Interval for session cleanup (default: 5 minutes)
    pub session_cleanup_interval: Duration,
}

impl Default for JobSchedulerConfig {
    fn default() -> Self {
        Self {
            session_cleanup_interval: Duration::from_secs(300),
        }
    }
}

/// Job Scheduler - runs periodic maintenance tasks
pub struct JobScheduler {
    pool: DbPool,
    config: JobSchedulerConfig,
}

impl JobScheduler {
    /// Create with custom configuration
    pub fn with_config(pool: DbPool, config: JobSchedulerConfig) -> Self {
        Self { pool, config }
    }

    /// Start the job scheduler in the background
    /// Returns a handle that can be used to abort the scheduler
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the scheduler loop
    async fn run(&self) {
        tracing::info!(
            interval_secs = self.config.session_cleanup_interval.as_secs(),
            "Job scheduler started"
        );

        let mut session_interval = interval(self.config.session_cleanup_interval);

        loop {
            session_interval.tick().await;
            if let Err(e) = cleanup_expired_sessions(&self.pool, Utc::now()).await {
                tracing::error!(error = %e, "Session cleanup failed");
            }
        }
    }

    /// Run all maintenance jobs once. Used at startup before the loop begins.
    pub async fn run_all_once(&self) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();

        match cleanup_expired_sessions(&self.pool, Utc::now()).await {
            Ok(count) => report.sessions_deleted = count,
            Err(e) => report.errors.push(format!("Session cleanup: {}", e)),
        }

        report.completed_at = Utc::now();
        report
    }
}

/// Report from running maintenance jobs
#[derive(Debug, Clone, Default)]
pub struct MaintenanceReport {
    pub sessions_deleted: u64,
    pub errors: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Job execution errors
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::domain::Session;

    async fn insert_session(pool: &DbPool, token_hash: &str, expires_at: DateTime<Utc>) {
        let mut conn = pool.acquire().await.unwrap();
        let record = Session {
            token_hash: token_hash.to_string(),
            username: "alice".to_string(),
            created_at: expires_at - chrono::Duration::hours(24),
            expires_at,
        };
        SessionCrud::new().add(&record, &mut conn).await.unwrap();
    }

    #[test]
    fn test_job_scheduler_config_default() {
        let config = JobSchedulerConfig::default();
        assert_eq!(config.session_cleanup_interval, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_run_all_once_reports_storage_failure() {
        let pool = test_pool().await;
        sqlx::query("DROP TABLE sessions").execute(&pool).await.unwrap();

        let scheduler = JobScheduler::with_config(pool, JobSchedulerConfig::default());
        let report = scheduler.run_all_once().await;

        assert_eq!(report.sessions_deleted, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Session cleanup"));
    }

    #[test]
    fn test_maintenance_report_default() {
        let report = MaintenanceReport::default();
        assert_eq!(report.sessions_deleted, 0);
        assert_eq!(report.errors.len(), 0);
    }

    #[tokio::test]
    async fn test_run_all_once_purges_expired_sessions() {
        let pool = test_pool().await;
        let now = Utc::now();
        insert_session(&pool, "expired", now - chrono::Duration::hours(1)).await;
        insert_session(&pool, "live", now + chrono::Duration::hours(1)).await;

        let scheduler = JobScheduler::with_config(pool.clone(), JobSchedulerConfig::default());
        let report = scheduler.run_all_once().await;

        assert_eq!(report.sessions_deleted, 1);
        assert!(report.errors.is_empty());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 1);
    }
}
