//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the logger, repository, service and HTTP server in order
//! - Serve until shutdown, bounded by the configured deadline
//! - Close the logger last so shutdown-time entries still reach the sink
//!
//! # Design Decisions
//! - Fail fast: any construction error is fatal
//! - The logger's worker is not tied to the shutdown token; `close` drains it

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, ConfigError};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::logger::{AsyncLogger, Sink};
use crate::repository::MemoryTaskRepository;
use crate::service::TaskService;

/// A fully wired application, ready to serve.
pub struct App {
    server: HttpServer,
    logger: Arc<AsyncLogger>,
    shutdown: Shutdown,
    shutdown_timeout: Duration,
}

impl App {
    /// Wire every component from resolved configuration.
    pub fn build(config: &AppConfig, sink: Sink, shutdown: Shutdown) -> Result<Self, ConfigError> {
        let logger = Arc::new(AsyncLogger::from_config(&config.logging, sink)?);
        let repo = Arc::new(MemoryTaskRepository::new());
        let service = TaskService::new(repo, logger.clone());
        let server = HttpServer::new(&config.server, service, logger.clone(), shutdown.token());

        Ok(Self {
            server,
            logger,
            shutdown,
            shutdown_timeout: Duration::from_secs(config.server.shutdown_timeout_secs),
        })
    }

    /// Start the logger and serve until shutdown is triggered or the server
    /// fails. In-flight requests get `shutdown_timeout` to finish.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        self.logger.start(&CancellationToken::new());

        let mut server = tokio::spawn(self.server.run(listener));

        let result = tokio::select! {
            joined = &mut server => flatten(joined),
            _ = self.shutdown.triggered() => {
                tracing::info!("Received shutdown signal, shutting down gracefully");
                match tokio::time::timeout(self.shutdown_timeout, &mut server).await {
                    Ok(joined) => flatten(joined),
                    Err(_) => {
                        tracing::warn!(
                            timeout_secs = self.shutdown_timeout.as_secs(),
                            "Server forced to shutdown"
                        );
                        server.abort();
                        Ok(())
                    }
                }
            }
        };

        self.logger.close().await;
        tracing::info!("Server exited");
        result
    }
}

fn flatten(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> std::io::Result<()> {
    joined.map_err(std::io::Error::other)?
}
