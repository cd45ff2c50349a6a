use std::env;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "RUST_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const SERVER_DISPLAY_NAME: &str = "ScripterI/O MCP Server";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_name: &'static str,
    pub server_version: &'static str,
    pub log_filter: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RUST_LOG must be a valid tracing filter: {0}")]
    InvalidLogFilter(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_log_filter(env::var(LOG_FILTER_ENV).ok())
    }

    pub fn from_log_filter(log_filter: Option<String>) -> Result<Self, ConfigError> {
        let log_filter = log_filter
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        EnvFilter::try_new(&log_filter)
            .map_err(|err| ConfigError::InvalidLogFilter(err.to_string()))?;

        Ok(Self {
            server_name: env!("CARGO_PKG_NAME"),
            server_version: env!("CARGO_PKG_VERSION"),
            log_filter,
        })
    }

    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }

    /// One-line startup banner, written to stderr once the transport is bound.
    pub fn banner(&self) -> String {
        format!(
            "{SERVER_DISPLAY_NAME} {} is running on stdio",
            self.server_version
        )
    }
}
