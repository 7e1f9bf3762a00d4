//! Request forwarding core.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → Forwarder::translate_request (verbatim copy)
//!     → Forwarder::execute (UpstreamClient, optional timeout, cancellation)
//!     → Forwarder::translate_response (verbatim copy)
//!     → OutboundResponse
//! ```
//!
//! # Design Decisions
//! - Headers travel as an ordered list of pairs, never a merged map
//! - An absent body is `None`, never an empty buffer
//! - Bodies are buffered in full on both legs
//! - Failures are values (`ForwardError`), never retried

pub mod client;
pub mod error;
pub mod forwarder;
pub mod model;

pub use client::{HyperUpstream, UpstreamClient};
pub use error::ForwardError;
pub use forwarder::Forwarder;
pub use model::{HeaderList, InboundRequest, OutboundRequest, OutboundResponse, UpstreamResponse};
