//! Service configuration
//!
//! Configuration is loaded from environment variables; the binary loads a
//! local `.env` first so development values can live next to the code.

use crate::error::{Result, ServiceError};
use std::env;

/// Top-level service configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// HTTP server binding
    pub server: ServerConfig,
    /// Hospital Directory API connection
    pub directory: DirectoryConfig,
    /// Batch processing limits
    pub limits: LimitsConfig,
}

/// HTTP server binding configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Hospital Directory API connection settings
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Base URL of the Hospital Directory API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retry schedule for hospital creation calls
    pub retry: RetryConfig,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for hospital creation calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum attempts per hospital, first try included
    pub max_attempts: u32,
    /// Delay before the first retry (milliseconds)
    pub initial_delay_ms: u64,
    /// Ceiling for the doubling backoff (milliseconds)
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 8000,
        }
    }
}

/// Batch processing limits
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Maximum data rows accepted per upload
    pub max_hospitals_per_batch: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_hospitals_per_batch: 20,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `HOSPITAL_API_URL` is required; everything else falls back to a
    /// default.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("HOSPITAL_API_URL")
            .map_err(|_| ServiceError::Config("HOSPITAL_API_URL must be set".to_string()))?;

        let mut config = Self::default();
        config.directory.base_url = base_url;

        if let Ok(host) = env::var("SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
        }
        if let Ok(timeout) = env::var("API_TIMEOUT") {
            config.directory.timeout_secs = timeout
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid API_TIMEOUT: {}", e)))?;
        }
        if let Ok(retries) = env::var("MAX_RETRIES") {
            config.directory.retry.max_attempts = retries
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid MAX_RETRIES: {}", e)))?;
        }
        if let Ok(delay) = env::var("RETRY_DELAY_MS") {
            config.directory.retry.initial_delay_ms = delay
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid RETRY_DELAY_MS: {}", e)))?;
        }
        if let Ok(cap) = env::var("RETRY_MAX_DELAY_MS") {
            config.directory.retry.max_delay_ms = cap
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid RETRY_MAX_DELAY_MS: {}", e)))?;
        }
        if let Ok(max) = env::var("MAX_HOSPITALS_PER_BATCH") {
            config.limits.max_hospitals_per_batch = max.parse().map_err(|e| {
                ServiceError::Config(format!("Invalid MAX_HOSPITALS_PER_BATCH: {}", e))
            })?;
        }

        Ok(config)
    }
}
