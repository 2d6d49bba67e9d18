//! Task manager REST service with an asynchronous JSON logger.

pub mod config;
pub mod domain;
pub mod http;
pub mod lifecycle;
pub mod logger;
pub mod observability;
pub mod repository;
pub mod service;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{App, Shutdown};
pub use logger::AsyncLogger;
