//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::logger::Level;

/// Environment variable holding the listen address.
pub const ENV_ADDR: &str = "ADDR";
/// Environment variable holding the minimum log level.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
/// Environment variable holding the log queue capacity.
pub const ENV_LOG_BUFFER_SIZE: &str = "LOG_BUFFER_SIZE";

/// Error type for configuration loading. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("LOG_BUFFER_SIZE must be a positive integer, got: {0:?}")]
    InvalidBufferSize(String),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file. Not validated.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Overlay environment values onto `config`.
///
/// `env` is the lookup function, normally `|key| std::env::var(key).ok()`.
/// Empty values count as unset. An unrecognized `LOG_LEVEL` selects INFO;
/// a non-numeric or non-positive `LOG_BUFFER_SIZE` is an error.
pub fn apply_env_overrides<F>(config: &mut AppConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(addr) = lookup(ENV_ADDR) {
        config.server.bind_address = normalize_bind_address(&addr);
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = Level::parse_or_default(&level);
    }

    if let Some(raw) = lookup(ENV_LOG_BUFFER_SIZE) {
        config.logging.buffer_size = parse_buffer_size(&raw)?;
    }

    Ok(())
}

/// Parse a queue capacity, rejecting anything that is not a positive integer.
pub fn parse_buffer_size(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => usize::try_from(n).map_err(|_| ConfigError::InvalidBufferSize(raw.to_string())),
        _ => Err(ConfigError::InvalidBufferSize(raw.to_string())),
    }
}

/// Accept the `:8080` shorthand for "all interfaces".
pub fn normalize_bind_address(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

/// Full startup resolution: defaults, optional file, environment, CLI
/// override, then validation.
pub fn resolve_config<F>(
    path: Option<&Path>,
    env: F,
    bind_override: Option<&str>,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, env)?;

    if let Some(addr) = bind_override {
        config.server.bind_address = normalize_bind_address(addr);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
