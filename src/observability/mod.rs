//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Process lifecycle, HTTP trace layer:
//!     → tracing.rs (tracing-subscriber, stderr)
//!
//! Request middleware, async logger worker:
//!     → metrics.rs (counters, histograms)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Application log lines are owned by `crate::logger`, not by tracing
//! - Metrics are cheap no-ops until a recorder is installed

pub mod metrics;
pub mod tracing;
