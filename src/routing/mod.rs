//! Path routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration:
//!     (method, "/users/:id", handler)
//!     → pattern.rs (normalize, validate parameter names)
//!     → table.rs (per-method tree, validator splicing)
//!     → tree.rs / node.rs (radix insert, priority sort)
//!
//! Request Resolution:
//!     (method, "/users/42")
//!     → table.rs (pick the method's tree)
//!     → tree.rs (prioritized descent with backtracking)
//!     → Return: matched Route + Params, or None
//! ```
//!
//! # Design Decisions
//! - Static text beats `:param`, which beats `*wildcard`
//! - Tokens are never split across tree nodes
//! - Captures from abandoned branches never leak into the result

pub mod node;
pub mod params;
pub mod pattern;
pub mod table;
pub mod tree;

pub use node::Node;
pub use params::Params;
pub use pattern::{ParamKind, ParamSpec, Pattern, PatternError};
pub use table::{Resolved, Route, RouteError, RouteTable};
pub use tree::{Tree, TreeError};
