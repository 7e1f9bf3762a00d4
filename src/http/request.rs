//! Inbound request extraction.
//!
//! # Responsibilities
//! - Resolve the absolute upstream URL the request was addressed to
//! - Collect every header occurrence in transport order
//! - Buffer the body byte-for-byte, keeping "absent" distinct from "empty"
//!
//! # Design Decisions
//! - Absolute-form targets are used verbatim
//! - Origin-form targets are rebuilt from `Host` with the `http` scheme
//! - A body that overruns the size limit is rejected
//! - Any other body read failure is logged and treated as absent

use axum::body::{Body, Bytes};
use axum::http::{header, uri::Scheme, HeaderMap, Request, Uri};
use http_body_util::LengthLimitError;

use crate::forward::{ForwardError, HeaderList, InboundRequest};

/// Turn an axum request into an [`InboundRequest`].
pub async fn into_inbound(request: Request<Body>) -> Result<InboundRequest, ForwardError> {
    let (parts, body) = request.into_parts();

    let url = resolve_target(&parts.uri, &parts.headers)?;
    let headers = HeaderList::from(&parts.headers);
    let body = extract_body(body, has_body_framing(&parts.headers)).await?;

    Ok(InboundRequest::new(parts.method, url, headers, body))
}

/// The absolute URL this request should be forwarded to.
pub fn resolve_target(uri: &Uri, headers: &HeaderMap) -> Result<Uri, ForwardError> {
    match (uri.scheme(), uri.authority()) {
        (Some(_), Some(_)) => return Ok(uri.clone()),
        (None, Some(authority)) => {
            return Err(ForwardError::InvalidRequest(format!(
                "authority-form target '{}' is not supported",
                authority
            )));
        }
        _ => {}
    }

    let host = headers
        .get(header::HOST)
        .ok_or_else(|| ForwardError::InvalidRequest("request has no Host header".to_string()))?
        .to_str()
        .map_err(|_| ForwardError::InvalidRequest("Host header is not visible ASCII".to_string()))?;

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(host)
        .path_and_query(path_and_query)
        .build()
        .map_err(|e| ForwardError::InvalidRequest(format!("cannot build target URL: {}", e)))
}

/// Whether the request declares a body through `Content-Length` or `Transfer-Encoding`.
pub fn has_body_framing(headers: &HeaderMap) -> bool {
    headers.contains_key(header::CONTENT_LENGTH) || headers.contains_key(header::TRANSFER_ENCODING)
}

/// Read the whole body. `None` when nothing was sent and nothing was declared.
///
/// Fails only when the body limit layer cut the stream short.
pub async fn extract_body(body: Body, framed: bool) -> Result<Option<Bytes>, ForwardError> {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) if bytes.is_empty() && !framed => Ok(None),
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if exceeds_limit(&e) => Err(ForwardError::BodyTooLarge),
        Err(e) => {
            tracing::error!(error = %e, "Error extracting body from inbound request");
            Ok(None)
        }
    }
}

/// Whether a [`LengthLimitError`] appears anywhere in the source chain.
fn exceeds_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
