//! Process diagnostics via `tracing`.
//!
//! Startup, shutdown and HTTP trace-layer output go here, on stderr. The
//! application's own JSON log lines go through [`crate::logger`] instead.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
