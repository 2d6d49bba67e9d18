//! HTTP transport for the task API.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, per-request cancellation token)
//!     → handlers.rs (decode, validate, call the service, log)
//!     → response.rs (JSON bodies, error mapping)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Handlers log through the async logger, tagged with the request ID
//! - Client errors carry fixed messages; internals stay in the logs

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestContext, X_REQUEST_ID};
pub use response::{ApiError, ErrorResponse};
pub use server::{build_router, AppState, HttpServer};
