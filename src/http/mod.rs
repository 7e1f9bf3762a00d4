//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (resolve target URL, collect headers, buffer body)
//!     → forward::Forwarder (upstream exchange)
//!     → response.rs (replay status/headers/body, map errors to status codes)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use server::HttpServer;
