//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router and server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the tower-http layers into every request span
//! - Metrics are labelled by route pattern, never by raw path, to bound cardinality

pub mod logging;
pub mod metrics;
