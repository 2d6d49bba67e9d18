//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs, --config)
//!     → environment: ADDR, LOG_LEVEL, LOG_BUFFER_SIZE (loader.rs)
//!     → CLI --addr override
//!     → validation.rs (semantic checks)
//!     → AppConfig (immutable for the life of the process)
//! ```
//!
//! # Design Decisions
//! - Resolved once at startup; nothing reloads it
//! - All fields have defaults to allow minimal configs
//! - Any error here aborts the process before traffic is served

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, resolve_config, ConfigError};
pub use schema::{AppConfig, LoggingConfig, ObservabilityConfig, ServerConfig};
pub use validation::{validate_config, ValidationError};
