//! Task business rules.
//!
//! # Data Flow
//! ```text
//! http handlers
//!     → task.rs (validate, generate ids, apply status changes)
//!     → repository (storage)
//!     → logger (one or more entries per operation)
//! ```

pub mod task;

pub use task::TaskService;
