//! Task manager (v1)
//!
//! A small task-tracking REST service built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http (axum router, middleware) ──▶ service ──▶ repository (in-memory)
//!                 │                                  │
//!                 └────────────┬─────────────────────┘
//!                              ▼
//!                    logger (bounded queue) ──▶ drain worker ──▶ stdout (JSON lines)
//!
//!   Cross-cutting: config (file + env + CLI), lifecycle (signals, shutdown),
//!                  observability (tracing on stderr, Prometheus metrics)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use task_manager::config::{resolve_config, ObservabilityConfig};
use task_manager::lifecycle::signals::wait_for_shutdown_signal;
use task_manager::observability;
use task_manager::{App, Shutdown};

#[derive(Parser)]
#[command(name = "task-manager")]
#[command(about = "Task tracking REST service", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address; overrides the file and the ADDR variable.
    #[arg(short, long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let resolved = resolve_config(
        cli.config.as_deref(),
        |key| std::env::var(key).ok(),
        cli.addr.as_deref(),
    );

    let filter = match &resolved {
        Ok(config) => config.observability.tracing_filter.clone(),
        Err(_) => ObservabilityConfig::default().tracing_filter,
    };
    observability::tracing::init_tracing(&filter);

    let config = match resolved {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration, aborting");
            return Err(e.into());
        }
    };

    tracing::info!(
        bind_address = %config.server.bind_address,
        log_level = %config.logging.level,
        log_buffer_size = config.logging.buffer_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<std::net::SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = observability::metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let app = App::build(&config, Box::new(std::io::stdout()), shutdown.clone())?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            tracing::error!(error = %e, "Failed to install signal handlers, falling back to Ctrl-C");
            let _ = tokio::signal::ctrl_c().await;
        }
        shutdown.trigger();
    });

    app.serve(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
