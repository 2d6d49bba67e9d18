//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, route, status
//! - `http_request_duration_seconds` (histogram): latency distribution
//! - `logger_entries_written_total` (counter): lines written by the drain worker
//! - `logger_entries_dropped_total` (counter): entries lost, by reason
//!
//! Recording goes through the `metrics` facade, so without an installed
//! recorder (tests, metrics disabled) every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a line written to the log sink.
pub fn record_log_written() {
    counter!("logger_entries_written_total").increment(1);
}

/// Record a log entry that never reached the sink.
///
/// Reasons: `cancelled`, `closed`, `encode`, `write`.
pub fn record_log_dropped(reason: &'static str) {
    counter!("logger_entries_dropped_total", "reason" => reason).increment(1);
}
