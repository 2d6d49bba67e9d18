//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve config → Build logger → Build service → Build server → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → Stop accepting → Drain requests
//!     → Close logger (drain queue) → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: server first, logger last
//! - Shutdown has a deadline: in-flight requests are abandoned after it

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::App;
