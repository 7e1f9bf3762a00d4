//! Metrics collection and exposition.
//!
//! # Metrics
//! - `passthrough_requests_total` (counter): requests by method, status
//! - `passthrough_request_duration_seconds` (histogram): end-to-end latency
//! - `passthrough_forward_failures_total` (counter): failed forwards by kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "passthrough_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "passthrough_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one forward that did not reach a response.
pub fn record_failure(kind: &'static str) {
    counter!("passthrough_forward_failures_total", "kind" => kind).increment(1);
}
