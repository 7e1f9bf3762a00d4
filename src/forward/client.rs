//! Network client used to reach upstreams.
//!
//! # Responsibilities
//! - Put an [`OutboundRequest`] on the wire
//! - Re-derive framing headers from the buffered body
//! - Buffer the complete upstream response
//!
//! # Design Decisions
//! - One client for the whole process; cloning shares the connection pool
//! - An absent body is sent without `Content-Length` or `Transfer-Encoding`
//! - A zero-length body is sent with `Content-Length: 0`

use std::future::Future;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Request};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::UpstreamConfig;
use crate::forward::error::ForwardError;
use crate::forward::model::{HeaderList, OutboundRequest, UpstreamResponse};

/// Sends one request upstream and returns the complete response.
///
/// Implementations must tolerate concurrent callers.
pub trait UpstreamClient: Send + Sync + 'static {
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, ForwardError>> + Send;
}

/// [`UpstreamClient`] backed by the hyper-util pooled client.
#[derive(Clone)]
pub struct HyperUpstream {
    client: Client<HttpConnector, Body>,
}

impl HyperUpstream {
    pub fn new(config: &UpstreamConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_nodelay(true);
        connector.set_connect_timeout(config.connect_timeout_secs.map(Duration::from_secs));

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }
}

impl Default for HyperUpstream {
    fn default() -> Self {
        Self::new(&UpstreamConfig::default())
    }
}

impl UpstreamClient for HyperUpstream {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, ForwardError> {
        let req = into_wire_request(request)?;

        let response = self
            .client
            .request(req)
            .await
            .map_err(|e| ForwardError::transport(&e))?;

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), usize::MAX)
            .await
            .map_err(|e| ForwardError::transport(&e))?;

        Ok(UpstreamResponse {
            status: parts.status,
            headers: HeaderList::from(&parts.headers),
            body,
        })
    }
}

/// Build the hyper request, fixing up framing for the buffered body.
fn into_wire_request(request: OutboundRequest) -> Result<Request<Body>, ForwardError> {
    let OutboundRequest { method, url, headers, body } = request;

    if url.scheme().is_none() || url.authority().is_none() {
        return Err(ForwardError::InvalidRequest(format!(
            "target URL '{}' is not absolute",
            url
        )));
    }

    let mut map = HeaderMap::with_capacity(headers.len() + 1);
    headers.append_to(&mut map);
    set_framing(&mut map, body.as_ref().map(|b| b.len()));

    let mut req = Request::builder()
        .method(method)
        .uri(url)
        .body(match body {
            Some(bytes) => Body::from(bytes),
            None => Body::empty(),
        })
        .map_err(|e| ForwardError::InvalidRequest(e.to_string()))?;

    *req.headers_mut() = map;
    Ok(req)
}

/// `None` means no body: both framing headers are removed.
fn set_framing(headers: &mut HeaderMap, body_len: Option<usize>) {
    headers.remove(header::TRANSFER_ENCODING);
    match body_len {
        Some(len) => {
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
        }
        None => {
            headers.remove(header::CONTENT_LENGTH);
        }
    }
}
