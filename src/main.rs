//! Single-hop HTTP passthrough proxy.
//!
//! Every inbound request is replayed against the absolute URL it was
//! addressed to, and the upstream's status, headers and body are relayed
//! back unchanged.
//!
//! ```text
//!     Client Request           ┌────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ http::server ─▶ http::request            │
//!                              │                      │                     │
//!                              │                      ▼                     │
//!                              │               forward::Forwarder ──────────┼──▶ Upstream
//!                              │                      │                     │
//!     Client Response          │                      ▼                     │
//!     ◀────────────────────────┼── http::response ◀───┘                     │
//!                              └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use passthrough_proxy::config::{load_config, ProxyConfig};
use passthrough_proxy::http::HttpServer;
use passthrough_proxy::lifecycle::signals::shutdown_on_signal;
use passthrough_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "passthrough-proxy")]
#[command(about = "Relay each HTTP request to the URL it was addressed to", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;

    tracing::info!("passthrough-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = ?config.upstream.request_timeout_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    tokio::spawn(shutdown_on_signal(server.shutdown_handle()));
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
