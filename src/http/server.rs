//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all task handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Serve on a listener until the shutdown token is cancelled

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::logger::AsyncLogger;
use crate::observability::metrics;
use crate::service::TaskService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: TaskService,
    pub logger: Arc<AsyncLogger>,
    /// Cancelled when the server begins shutting down.
    pub shutdown: CancellationToken,
}

/// HTTP server for the task API.
pub struct HttpServer {
    router: Router,
    shutdown: CancellationToken,
}

impl HttpServer {
    /// Create a new HTTP server. Cancelling `shutdown` starts a graceful stop.
    pub fn new(
        config: &ServerConfig,
        service: TaskService,
        logger: Arc<AsyncLogger>,
        shutdown: CancellationToken,
    ) -> Self {
        let state = AppState {
            service,
            logger,
            shutdown: shutdown.clone(),
        };
        let router = build_router(config, state);
        Self { router, shutdown }
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(self.shutdown.cancelled_owned())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .patch(handlers::update_task_status)
                .delete(handlers::delete_task),
        )
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Record request count and latency by matched route.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;
    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
