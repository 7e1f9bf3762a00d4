//! Forwarding failures.

use std::time::Duration;
use thiserror::Error;

/// Why a forward did not produce an upstream response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForwardError {
    /// The inbound request could not be turned into an upstream request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The inbound body grew past the configured limit while it was read.
    #[error("request body exceeds the configured limit")]
    BodyTooLarge,

    /// Connection, DNS or protocol failure while talking to the upstream.
    #[error("upstream transport failure: {0}")]
    Transport(String),

    /// The upstream did not answer within the configured deadline.
    #[error("upstream timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// The forward was interrupted before the upstream answered.
    #[error("forward cancelled: {0}")]
    Cancelled(String),
}

impl ForwardError {
    /// Build a transport error from any error, keeping its source chain.
    pub fn transport(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ForwardError::Transport(message)
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::InvalidRequest(_) => "invalid_request",
            ForwardError::BodyTooLarge => "body_too_large",
            ForwardError::Transport(_) => "transport",
            ForwardError::Timeout(_) => "timeout",
            ForwardError::Cancelled(_) => "cancelled",
        }
    }
}
