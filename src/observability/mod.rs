//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Server and forwarder produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (text or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID lives in the tracing span, not in forwarded headers
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
