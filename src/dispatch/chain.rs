//! Sequential execution of a route's handler chain.
//!
//! # Design Decisions
//! - The continuation is a value (`Next`: chain + cursor), not a closure over shared state
//! - `Next::run` takes `self`, so proceeding twice does not compile
//! - A handler may await anything before proceeding; the next handler starts only then

use std::sync::Arc;

use axum::response::Response;

use crate::dispatch::context::RequestContext;
use crate::dispatch::handler::{BoxedHandler, Failure, Flow, HandlerResult};

/// Continuation handed to each handler.
pub struct Next {
    chain: Arc<[BoxedHandler]>,
    position: usize,
}

impl Next {
    pub fn new(chain: Arc<[BoxedHandler]>) -> Self {
        Self { chain, position: 0 }
    }

    /// Proceed to the next handler, or report the chain as unhandled when exhausted.
    pub async fn run(self, cx: RequestContext) -> HandlerResult {
        let Some(handler) = self.chain.get(self.position).cloned() else {
            return Ok(Flow::Unhandled(cx));
        };
        let next = Next {
            chain: self.chain,
            position: self.position + 1,
        };
        handler.call(cx, next).await
    }

    /// Handlers still waiting to run.
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.position)
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("position", &self.position)
            .field("len", &self.chain.len())
            .finish()
    }
}

/// How a dispatched chain ended.
#[derive(Debug)]
pub enum Outcome {
    Completed(Response),
    Failed(Failure),
    Unhandled(RequestContext),
}

/// Runs one request through a resolved handler chain.
#[derive(Clone)]
pub struct Dispatcher {
    chain: Arc<[BoxedHandler]>,
}

impl Dispatcher {
    pub fn new(chain: Arc<[BoxedHandler]>) -> Self {
        Self { chain }
    }

    pub async fn run(&self, cx: RequestContext) -> Outcome {
        match Next::new(self.chain.clone()).run(cx).await {
            Ok(Flow::Handled(response)) => Outcome::Completed(response),
            Ok(Flow::Unhandled(cx)) => Outcome::Unhandled(cx),
            Err(failure) => Outcome::Failed(failure),
        }
    }
}
