//! Response serialization.
//!
//! # Responsibilities
//! - Replay the upstream status, every header occurrence and the body
//! - Map forwarding failures to client-facing status codes
//!
//! # Design Decisions
//! - `Transfer-Encoding` is dropped; the buffered body is re-framed by length
//! - Failure bodies carry the error message as plain text

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::forward::{ForwardError, OutboundResponse};

/// Serialize a relayed upstream response.
pub fn into_response(outbound: OutboundResponse) -> Response {
    let mut response = Response::new(Body::from(outbound.body));
    *response.status_mut() = outbound.status;

    let headers = response.headers_mut();
    outbound.headers.append_to(headers);
    headers.remove(header::TRANSFER_ENCODING);

    response
}

/// Status code the client sees for a failed forward.
pub fn status_for(err: &ForwardError) -> StatusCode {
    match err {
        ForwardError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ForwardError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ForwardError::Transport(_) => StatusCode::BAD_GATEWAY,
        ForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        ForwardError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Serialize a failed forward: mapped status, message as body.
pub fn error_response(err: &ForwardError) -> Response {
    (
        status_for(err),
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        err.to_string(),
    )
        .into_response()
}
