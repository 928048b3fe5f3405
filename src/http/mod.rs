//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, tower-http layers: request id, trace, body limit, timeout)
//!     → router.rs (method policy, resolve, percent-decode captures)
//!     → dispatch (validators, then route handlers)
//!     → responder.rs (configured routes) or application handlers
//!     → Send to client
//! ```

pub mod responder;
pub mod router;
pub mod server;

pub use responder::Responder;
pub use router::{parse_methods, Router, STANDARD_METHODS};
pub use server::HttpServer;
