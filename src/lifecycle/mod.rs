//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → stop accepting → drain period → cancel in-flight forwards → exit
//! ```
//!
//! # Design Decisions
//! - Shutdown state is a watch channel, so late subscribers still observe it
//! - Drain has a deadline: forwards still running after it are cancelled

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
