//! Handlers and the signals they return.

use std::future::Future;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::dispatch::chain::Next;
use crate::dispatch::context::RequestContext;

/// Boxed error type carried by [`Failure::Handler`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a handler hands back to its caller.
pub type HandlerResult = Result<Flow, Failure>;

/// Successful end of a handler chain.
#[derive(Debug)]
pub enum Flow {
    /// A handler produced the response.
    Handled(Response),
    /// Every handler proceeded and none responded.
    Unhandled(RequestContext),
}

/// The failure signal: remaining handlers are skipped.
#[derive(Debug, Error)]
pub enum Failure {
    /// Fail with an explicit status, e.g. a validator rejecting a parameter.
    #[error("request failed with status {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// A handler raised an error.
    #[error("handler error: {0}")]
    Handler(#[source] BoxError),
}

impl Failure {
    pub fn status(status: StatusCode) -> Self {
        Self::Status {
            status,
            message: None,
        }
    }

    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: Some(message.into()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::BAD_REQUEST, message)
    }

    pub fn from_error(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }

    /// Status the error path responds with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Status { status, .. } => *status,
            Self::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Status {
                message: Some(message),
                ..
            } => message,
            // Handler errors stay out of the response body.
            _ => status.canonical_reason().unwrap_or("Error").to_string(),
        };
        (status, body).into_response()
    }
}

/// Finish the chain with `response`.
pub fn respond(response: impl IntoResponse) -> HandlerResult {
    Ok(Flow::Handled(response.into_response()))
}

/// A step in a route's handler chain.
///
/// A handler either responds, fails, or proceeds by calling
/// [`Next::run`]; `Next` is consumed by that call, so a handler can proceed
/// at most once.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, cx: RequestContext, next: Next) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, cx: RequestContext, next: Next) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(cx, next))
    }
}

/// Shared, type-erased handler as stored in route chains.
pub type BoxedHandler = Arc<dyn Handler>;
