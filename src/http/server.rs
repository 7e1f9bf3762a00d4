//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all passthrough handler
//! - Wire up middleware (tracing, body limits)
//! - Bind server to listener with graceful shutdown
//! - Hand each request to the shared forwarder
//! - Observability (metrics, per-request span with a request ID)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ProxyConfig;
use crate::forward::{Forwarder, HyperUpstream};
use crate::http::{request, response};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder<HyperUpstream>>,
    pub shutdown: Shutdown,
    /// Grace period for in-flight forwards once shutdown starts.
    pub drain: Duration,
}

/// HTTP server for the passthrough proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let client = HyperUpstream::new(&config.upstream);
        let forwarder = Arc::new(Forwarder::new(client, config.upstream.request_timeout()));
        let shutdown = Shutdown::new();

        let state = AppState {
            forwarder,
            shutdown: shutdown.clone(),
            drain: config.shutdown.drain(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes)),
            )
    }

    /// Handle used to stop [`run`](Self::run).
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Run the server until the shutdown handle is triggered.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream_timeout = ?self.config.upstream.request_timeout(),
            "HTTP server starting"
        );

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move { shutdown.triggered().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward any request to the URL it was addressed to.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let span = tracing::info_span!(
        "forward",
        request_id = %Uuid::new_v4(),
        method = %method,
        uri = %request.uri(),
    );

    async move {
        let result = match request::into_inbound(request).await {
            Ok(inbound) => {
                let shutdown = state.shutdown.clone();
                let drain = state.drain;
                state
                    .forwarder
                    .forward_until(inbound, async move { shutdown.drained(drain).await })
                    .await
            }
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(outbound) => {
                tracing::debug!(
                    status = %outbound.status,
                    body_bytes = outbound.body.len(),
                    "Upstream responded"
                );
                response::into_response(outbound)
            }
            Err(e) => {
                tracing::error!(error = %e, "Forward failed");
                metrics::record_failure(e.kind());
                response::error_response(&e)
            }
        };

        metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
        response
    }
    .instrument(span)
    .await
}
