//! Configuration validation.
//!
//! Serde handles syntax; this checks value ranges and addresses. All problems
//! are collected, not just the first one.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("logging.buffer_size must be a positive integer")]
    ZeroBufferSize,

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field} is not a valid socket address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a fully resolved configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.logging.buffer_size == 0 {
        errors.push(ValidationError::ZeroBufferSize);
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "server.request_timeout_secs",
        });
    }
    if config.server.shutdown_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "server.shutdown_timeout_secs",
        });
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
