// src/config.rs

use std::env;
use std::str::FromStr;
use std::time::Duration;
use dotenvy::dotenv;

/// What happens when an attempt answers the same question more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResubmissionPolicy {
    /// Every submission is recorded and counted by the aggregator.
    #[default]
    Append,
    /// A second submission for the same (attempt, question) is refused.
    Reject,
}

impl FromStr for ResubmissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(ResubmissionPolicy::Append),
            "reject" => Ok(ResubmissionPolicy::Reject),
            other => Err(format!("unknown resubmission policy '{}'", other)),
        }
    }
}

/// Bounded retry applied to store writes that report a conflict.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub rust_log: String,
    pub port: u16,
    pub resubmission_policy: ResubmissionPolicy,
    pub write_retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            rust_log: "info".to_string(),
            port: 3000,
            resubmission_policy: ResubmissionPolicy::default(),
            write_retry: RetryConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Config::default();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or(defaults.rust_log);

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let resubmission_policy = env::var("RESUBMISSION_POLICY")
            .map(|raw| raw.parse().expect("RESUBMISSION_POLICY must be 'append' or 'reject'"))
            .unwrap_or(defaults.resubmission_policy);

        let max_attempts = env::var("WRITE_RETRY_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .map(|v| v.max(1))
            .unwrap_or(defaults.write_retry.max_attempts);

        let backoff = env::var("WRITE_RETRY_BACKOFF_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.write_retry.backoff);

        Self {
            database_url,
            rust_log,
            port,
            resubmission_policy,
            write_retry: RetryConfig { max_attempts, backoff },
        }
    }
}
