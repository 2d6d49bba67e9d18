//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every field has a default so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};

use crate::logger::Level;

/// Root configuration for the task manager.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Asynchronous application logger settings.
    pub logging: LoggingConfig,

    /// Process diagnostics and metrics.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// How long in-flight requests get to finish after a shutdown signal.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
        }
    }
}

/// Asynchronous logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level written (DEBUG, INFO, WARN, ERROR). Unknown names mean INFO.
    pub level: Level,

    /// Queue capacity. Must be positive.
    pub buffer_size: usize,
}

pub const DEFAULT_BUFFER_SIZE: usize = 100;

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub tracing_filter: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            tracing_filter: "task_manager=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
