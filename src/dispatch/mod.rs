//! Handler chain execution.
//!
//! # Data Flow
//! ```text
//! Resolved route chain [validators.., handlers..]
//!     → chain.rs (Dispatcher starts at position 0)
//!     → handler.rs (each handler responds, fails, or calls next)
//!     → Outcome: Completed | Failed | Unhandled
//! ```

pub mod chain;
pub mod context;
pub mod handler;

pub use chain::{Dispatcher, Next, Outcome};
pub use context::RequestContext;
pub use handler::{respond, BoxError, BoxedHandler, Failure, Flow, Handler, HandlerResult};
