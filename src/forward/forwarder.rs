//! The forwarding operation.

use std::future::Future;
use std::time::Duration;

use crate::forward::client::UpstreamClient;
use crate::forward::error::ForwardError;
use crate::forward::model::{InboundRequest, OutboundRequest, OutboundResponse, UpstreamResponse};

/// Relays one inbound request to its upstream and hands back the response.
///
/// Holds no per-request state, so a single instance serves every request.
pub struct Forwarder<C> {
    client: C,
    timeout: Option<Duration>,
}

impl<C: UpstreamClient> Forwarder<C> {
    /// `timeout` bounds the whole upstream exchange; `None` waits indefinitely.
    pub fn new(client: C, timeout: Option<Duration>) -> Self {
        Self { client, timeout }
    }

    /// Forward `inbound` and wait for the complete upstream response.
    pub async fn forward(&self, inbound: InboundRequest) -> Result<OutboundResponse, ForwardError> {
        self.forward_until(inbound, std::future::pending::<()>()).await
    }

    /// Like [`forward`](Self::forward), but gives up with
    /// [`ForwardError::Cancelled`] as soon as `cancelled` completes.
    ///
    /// The in-flight upstream call is dropped, which closes its connection.
    pub async fn forward_until<F>(
        &self,
        inbound: InboundRequest,
        cancelled: F,
    ) -> Result<OutboundResponse, ForwardError>
    where
        F: Future<Output = ()>,
    {
        let request = Self::translate_request(inbound);

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            headers = request.headers.len(),
            body_bytes = request.body.as_ref().map(|b| b.len()),
            "Forwarding request upstream"
        );

        let upstream = tokio::select! {
            biased;
            _ = cancelled => {
                return Err(ForwardError::Cancelled(
                    "interrupted before the upstream responded".to_string(),
                ));
            }
            result = self.execute(request) => result?,
        };

        Ok(Self::translate_response(upstream))
    }

    /// Copy method, URL, headers and body verbatim.
    pub fn translate_request(inbound: InboundRequest) -> OutboundRequest {
        OutboundRequest::from(inbound)
    }

    /// Send the request, applying the configured deadline.
    pub async fn execute(&self, request: OutboundRequest) -> Result<UpstreamResponse, ForwardError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.send(request))
                .await
                .map_err(|_| ForwardError::Timeout(limit))?,
            None => self.client.send(request).await,
        }
    }

    /// Copy status, every header occurrence and the body verbatim.
    pub fn translate_response(upstream: UpstreamResponse) -> OutboundResponse {
        OutboundResponse::from(upstream)
    }
}
