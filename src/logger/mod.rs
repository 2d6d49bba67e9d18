//! Asynchronous application logging.
//!
//! # Data Flow
//! ```text
//! request handlers / service (many producers)
//!     → async_logger.rs (level check, timestamp, enqueue or give up on cancel)
//!     → bounded mpsc queue (fixed capacity, FIFO)
//!     → drain worker (single consumer)
//!     → encode.rs (entry → JSON object → line)
//!     → sink.rs (stdout, or an in-memory buffer in tests)
//! ```
//!
//! # Design Decisions
//! - Logging never returns errors; encode and write failures drop the entry
//! - A full queue slows producers down instead of discarding entries
//! - Producers can always escape a full queue through their cancellation token
//! - Close drains everything that was accepted before returning
//! - Process diagnostics go through `tracing`; this logger is for application events

pub mod async_logger;
pub mod encode;
pub mod entry;
pub mod level;
pub mod sink;

pub use async_logger::AsyncLogger;
pub use entry::{attr, Attr, LogEntry, Value};
pub use level::Level;
pub use sink::{MemorySink, Sink};
