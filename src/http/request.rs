//! Per-request context.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) when the client sent none
//! - Hand handlers the request ID and a cancellation token for log emission
//!
//! # Design Decisions
//! - Request ID is set by the outermost layer so the trace span sees it
//! - The token is a child of the server shutdown token; a shutdown lets
//!   handlers stop waiting on a full log queue

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio_util::sync::CancellationToken;

use crate::http::server::AppState;
use crate::logger::{attr, Attr};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request-scoped values extracted for every handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub cancel: CancellationToken,
}

impl RequestContext {
    /// `request_id` log attribute.
    pub fn id_attr(&self) -> Attr {
        attr("request_id", self.request_id.as_str())
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            request_id,
            cancel: state.shutdown.child_token(),
        })
    }
}
