//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_DOCKER_SOCKET, DEFAULT_SCHEDULER_CACHE_CAPACITY, DEFAULT_SCHEDULER_MEMORY_LIMIT_MB,
    DEFAULT_SCHEDULER_QUEUE_CAPACITY, DEFAULT_SCHEDULER_WORKERS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub docker: DockerConfig,
    pub scheduler: SchedulerConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Docker daemon connection configuration
#[derive(Debug, Clone)]
pub struct DockerConfig {
    pub socket_path: String,
}

/// Scheduler and sandbox resource configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Number of pinned worker executors
    pub workers: usize,
    /// Bounded intake queue capacity
    pub queue_capacity: usize,
    /// Bounded result cache capacity
    pub cache_capacity: usize,
    /// Per-container memory ceiling in megabytes (swap ceiling matches this)
    pub memory_limit_mb: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            docker: DockerConfig::from_env()?,
            scheduler: SchedulerConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DockerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            socket_path: env::var("DOCKER_SOCKET")
                .unwrap_or_else(|_| DEFAULT_DOCKER_SOCKET.to_string()),
        })
    }
}

impl SchedulerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            workers: env::var("SCHEDULER_WORKERS")
                .unwrap_or_else(|_| DEFAULT_SCHEDULER_WORKERS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SCHEDULER_WORKERS".to_string()))?,
            queue_capacity: env::var("SCHEDULER_QUEUE_CAPACITY")
                .unwrap_or_else(|_| DEFAULT_SCHEDULER_QUEUE_CAPACITY.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SCHEDULER_QUEUE_CAPACITY".to_string()))?,
            cache_capacity: env::var("SCHEDULER_CACHE_CAPACITY")
                .unwrap_or_else(|_| DEFAULT_SCHEDULER_CACHE_CAPACITY.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SCHEDULER_CACHE_CAPACITY".to_string()))?,
            memory_limit_mb: env::var("SCHEDULER_MEMORY_LIMIT_MB")
                .unwrap_or_else(|_| DEFAULT_SCHEDULER_MEMORY_LIMIT_MB.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SCHEDULER_MEMORY_LIMIT_MB".to_string()))?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_scheduler_defaults_match_constants() {
        let scheduler = SchedulerConfig {
            workers: DEFAULT_SCHEDULER_WORKERS,
            queue_capacity: DEFAULT_SCHEDULER_QUEUE_CAPACITY,
            cache_capacity: DEFAULT_SCHEDULER_CACHE_CAPACITY,
            memory_limit_mb: DEFAULT_SCHEDULER_MEMORY_LIMIT_MB,
        };
        assert_eq!(scheduler.workers, 4);
        assert_eq!(scheduler.memory_limit_mb, 1024);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        unsafe {
            env::set_var("SERVER_PORT", "not-a-port");
        }
        let result = ServerConfig::from_env();
        unsafe {
            env::remove_var("SERVER_PORT");
        }
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
