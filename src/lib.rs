//! Radix-tree HTTP routing library.
//!
//! Routes are compiled into one compressed prefix tree per HTTP method.
//! A resolved route yields a handler chain (parameter validators, then the
//! route's own handlers) which is run with a single-use continuation.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use dispatch::{respond, Failure, Next, RequestContext};
pub use http::{HttpServer, Router};
pub use lifecycle::Shutdown;
pub use routing::{Params, RouteTable, Tree};
