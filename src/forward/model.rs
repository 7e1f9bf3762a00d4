//! Request and response descriptors exchanged by the forwarder.

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};

/// Ordered header pairs. Repeated names stay as separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList(Vec<(HeaderName, HeaderValue)>);

impl HeaderList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one occurrence of a header.
    pub fn push(&mut self, name: HeaderName, value: HeaderValue) {
        self.0.push((name, value));
    }

    /// All values recorded for `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HeaderValue> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| n.as_str().eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write every pair into `map` with `append`, so duplicates survive.
    pub fn append_to(&self, map: &mut HeaderMap) {
        for (name, value) in &self.0 {
            map.append(name.clone(), value.clone());
        }
    }

    /// Build a `HeaderMap` holding every pair.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.0.len());
        self.append_to(&mut map);
        map
    }
}

impl From<&HeaderMap> for HeaderList {
    /// `HeaderMap::iter` yields each value of a multi-valued header separately.
    fn from(map: &HeaderMap) -> Self {
        Self(map.iter().map(|(n, v)| (n.clone(), v.clone())).collect())
    }
}

impl FromIterator<(HeaderName, HeaderValue)> for HeaderList {
    fn from_iter<I: IntoIterator<Item = (HeaderName, HeaderValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A request as received from the transport layer.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Absolute URL the request was addressed to.
    pub url: Uri,
    pub headers: HeaderList,
    /// `None` when the request carried no body at all.
    pub body: Option<Bytes>,
}

impl InboundRequest {
    pub fn new(method: Method, url: Uri, headers: HeaderList, body: Option<Bytes>) -> Self {
        Self { method, url, headers, body }
    }
}

/// The request sent upstream. Same shape as [`InboundRequest`].
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Uri,
    pub headers: HeaderList,
    pub body: Option<Bytes>,
}

impl From<InboundRequest> for OutboundRequest {
    fn from(inbound: InboundRequest) -> Self {
        Self {
            method: inbound.method,
            url: inbound.url,
            headers: inbound.headers,
            body: inbound.body,
        }
    }
}

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderList,
    pub body: Bytes,
}

/// The response handed back to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: HeaderList,
    pub body: Bytes,
}

impl From<UpstreamResponse> for OutboundResponse {
    fn from(upstream: UpstreamResponse) -> Self {
        Self {
            status: upstream.status,
            headers: upstream.headers,
            body: upstream.body,
        }
    }
}
