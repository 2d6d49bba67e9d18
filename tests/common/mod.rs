//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use task_manager::config::{AppConfig, ServerConfig};
use task_manager::http::{build_router, AppState};
use task_manager::logger::{AsyncLogger, Level, MemorySink};
use task_manager::repository::MemoryTaskRepository;
use task_manager::service::TaskService;
use task_manager::{App, Shutdown};

/// Logger bound to an in-memory sink. Not started.
#[allow(dead_code)]
pub fn memory_logger(level: Level, capacity: usize) -> (Arc<AsyncLogger>, MemorySink) {
    let sink = MemorySink::new();
    let logger = AsyncLogger::new(
        Box::new(sink.clone()),
        level,
        NonZeroUsize::new(capacity).expect("capacity must be positive"),
    );
    (Arc::new(logger), sink)
}

/// Every sink line parsed as JSON.
#[allow(dead_code)]
pub fn json_lines(sink: &MemorySink) -> Vec<Value> {
    sink.lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("log line is not valid JSON"))
        .collect()
}

/// Fully layered router over a fresh repository, with a started logger.
#[allow(dead_code)]
pub fn test_router(level: Level) -> (Router, Arc<AsyncLogger>, MemorySink) {
    let (logger, sink) = memory_logger(level, 64);
    logger.start(&CancellationToken::new());

    let service = TaskService::new(Arc::new(MemoryTaskRepository::new()), logger.clone());
    let state = AppState {
        service,
        logger: logger.clone(),
        shutdown: CancellationToken::new(),
    };
    (build_router(&ServerConfig::default(), state), logger, sink)
}

/// Send one request through the router and decode the JSON body (if any).
#[allow(dead_code)]
pub async fn send(router: &Router, request: Request<Body>) -> (Response<Body>, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (Response::from_parts(parts, Body::empty()), json)
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a body-less request.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Start the whole application on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_app(
    mut config: AppConfig,
) -> (SocketAddr, Shutdown, MemorySink, JoinHandle<std::io::Result<()>>) {
    config.server.bind_address = "127.0.0.1:0".to_string();
    let listener = TcpListener::bind(&config.server.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let sink = MemorySink::new();
    let shutdown = Shutdown::new();
    let app = App::build(&config, Box::new(sink.clone()), shutdown.clone()).unwrap();
    let handle = tokio::spawn(app.serve(listener));

    (addr, shutdown, sink, handle)
}
