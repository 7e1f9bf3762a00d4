//! Single-hop HTTP passthrough proxy library.

pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use forward::{ForwardError, Forwarder};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
