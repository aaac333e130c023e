use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use pulse_core::error::CoreError;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deadline for stopping the job pool and background tasks (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Number of job pool workers (default: `10`).
    pub job_workers: usize,
    /// Job queue capacity; submissions beyond it are dropped (default: `100`).
    pub job_queue_capacity: usize,
    /// Simulated work per job in milliseconds (default: `2000`).
    pub job_duration_ms: u64,
    /// Demo jobs enqueued at startup (default: `100`, `0` disables).
    pub demo_job_count: u32,
    /// Spacing between demo jobs in milliseconds (default: `50`).
    pub demo_job_interval_ms: u64,
    /// Per-subscriber mailbox capacity (default: `256`).
    pub subscriber_mailbox: usize,
    /// Period of the job-status and system-metrics producers (default: `2`).
    pub broadcast_interval_secs: u64,
    /// Period of metrics persistence (default: `5`).
    pub metrics_persist_interval_secs: u64,
    /// Stored metrics older than this are purged (default: `24`).
    pub metrics_retention_hours: i64,
    /// Period of the health monitor log line (default: `30`).
    pub health_check_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            cors_origins: vec!["http://localhost:3000".into()],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 5,
            job_workers: 10,
            job_queue_capacity: 100,
            job_duration_ms: 2000,
            demo_job_count: 100,
            demo_job_interval_ms: 50,
            subscriber_mailbox: pulse_events::DEFAULT_MAILBOX_CAPACITY,
            broadcast_interval_secs: 2,
            metrics_persist_interval_secs: 5,
            metrics_retention_hours: 24,
            health_check_interval_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `8080`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`         | `5`                     |
    /// | `JOB_WORKERS`                   | `10`                    |
    /// | `JOB_QUEUE_CAPACITY`            | `100`                   |
    /// | `JOB_DURATION_MS`               | `2000`                  |
    /// | `DEMO_JOB_COUNT`                | `100`                   |
    /// | `DEMO_JOB_INTERVAL_MS`          | `50`                    |
    /// | `SUBSCRIBER_MAILBOX`            | `256`                   |
    /// | `BROADCAST_INTERVAL_SECS`       | `2`                     |
    /// | `METRICS_PERSIST_INTERVAL_SECS` | `5`                     |
    /// | `METRICS_RETENTION_HOURS`       | `24`                    |
    /// | `HEALTH_CHECK_INTERVAL_SECS`    | `30`                    |
    ///
    /// Panics on values that do not parse; misconfiguration should fail
    /// at startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let cors_origins: Vec<String> = match std::env::var("CORS_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => defaults.cors_origins,
        };

        Self {
            host,
            port: env_or("PORT", defaults.port),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", defaults.shutdown_timeout_secs),
            job_workers: env_or("JOB_WORKERS", defaults.job_workers),
            job_queue_capacity: env_or("JOB_QUEUE_CAPACITY", defaults.job_queue_capacity),
            job_duration_ms: env_or("JOB_DURATION_MS", defaults.job_duration_ms),
            demo_job_count: env_or("DEMO_JOB_COUNT", defaults.demo_job_count),
            demo_job_interval_ms: env_or("DEMO_JOB_INTERVAL_MS", defaults.demo_job_interval_ms),
            subscriber_mailbox: env_or("SUBSCRIBER_MAILBOX", defaults.subscriber_mailbox),
            broadcast_interval_secs: env_or(
                "BROADCAST_INTERVAL_SECS",
                defaults.broadcast_interval_secs,
            ),
            metrics_persist_interval_secs: env_or(
                "METRICS_PERSIST_INTERVAL_SECS",
                defaults.metrics_persist_interval_secs,
            ),
            metrics_retention_hours: env_or(
                "METRICS_RETENTION_HOURS",
                defaults.metrics_retention_hours,
            ),
            health_check_interval_secs: env_or(
                "HEALTH_CHECK_INTERVAL_SECS",
                defaults.health_check_interval_secs,
            ),
        }
    }

    /// Reject values the pool, hub or producers cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        let non_zero = [
            ("JOB_WORKERS", self.job_workers as u64),
            ("JOB_QUEUE_CAPACITY", self.job_queue_capacity as u64),
            ("SUBSCRIBER_MAILBOX", self.subscriber_mailbox as u64),
            ("REQUEST_TIMEOUT_SECS", self.request_timeout_secs),
            ("BROADCAST_INTERVAL_SECS", self.broadcast_interval_secs),
            ("METRICS_PERSIST_INTERVAL_SECS", self.metrics_persist_interval_secs),
            ("HEALTH_CHECK_INTERVAL_SECS", self.health_check_interval_secs),
        ];
        if let Some((name, _)) = non_zero.iter().find(|(_, value)| *value == 0) {
            return Err(CoreError::Validation(format!("{name} must be greater than zero")));
        }

        if self.metrics_retention_hours <= 0 {
            return Err(CoreError::Validation(
                "METRICS_RETENTION_HOURS must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    pub fn job_duration(&self) -> Duration {
        Duration::from_millis(self.job_duration_ms)
    }

    pub fn demo_job_interval(&self) -> Duration {
        Duration::from_millis(self.demo_job_interval_ms)
    }

    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_secs(self.broadcast_interval_secs)
    }

    pub fn metrics_persist_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_persist_interval_secs)
    }

    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid number: {e}")),
        Err(_) => default,
    }
}
