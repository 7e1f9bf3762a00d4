//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use passthrough_proxy::config::ProxyConfig;
use passthrough_proxy::http::HttpServer;
use passthrough_proxy::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// A request exactly as the mock upstream read it off the socket.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request line and header lines, without the blank line.
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    /// Values of every header line named `name`, in wire order.
    pub fn header_values(&self, name: &str) -> Vec<String> {
        header_values(&self.head, name)
    }
}

fn header_values(head: &str, name: &str) -> Vec<String> {
    head.lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .filter(|(n, _)| n.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim().to_string())
        .collect()
}

/// Build a raw HTTP/1.1 response that closes the connection.
pub fn raw_response(status_line: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {}\r\n", status_line);
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n", body.len()));

    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

/// Start a mock upstream. Every request is reported on the returned channel
/// and answered with the bytes `respond` produces.
pub async fn start_upstream<F>(respond: F) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>)
where
    F: Fn(&CapturedRequest) -> Vec<u8> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let respond = respond.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            let response = respond(&request);
                            let _ = tx.send(request);
                            let _ = socket.write_all(&response).await;
                            let _ = socket.shutdown().await;
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// Upstream that answers `200 OK` with the request body it received.
pub async fn start_echo_upstream() -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    start_upstream(|request| {
        raw_response(
            "200 OK",
            &[("X-Echo-Request-Line", request.request_line())],
            &request.body,
        )
    })
    .await
}

/// What a stalled upstream observed on one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalledEvent {
    /// A full request head (and body) arrived.
    Received,
    /// The proxy closed the connection.
    Closed,
}

/// Upstream that reads requests and never answers. Reports when a request
/// arrives and when the proxy hangs up.
pub async fn start_stalled_upstream() -> (SocketAddr, mpsc::UnboundedReceiver<StalledEvent>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                if read_request(&mut socket).await.is_some() {
                    let _ = tx.send(StalledEvent::Received);
                }
                let mut chunk = [0u8; 1024];
                while let Ok(n) = socket.read(&mut chunk).await {
                    if n == 0 {
                        break;
                    }
                }
                let _ = tx.send(StalledEvent::Closed);
            });
        }
    });

    (addr, rx)
}

/// An address with nothing listening on it.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    (addr, shutdown)
}

/// Write `request` to the proxy over a fresh connection and return the
/// response head.
pub async fn send_raw(proxy: SocketAddr, request: &[u8]) -> String {
    let mut socket = TcpStream::connect(proxy).await.unwrap();
    socket.write_all(request).await.unwrap();

    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// A client that sends absolute-form requests through the proxy.
pub fn proxied_client(proxy: SocketAddr) -> reqwest::Client {
    reqwest::Client::builder()
        .proxy(reqwest::Proxy::http(format!("http://{}", proxy)).unwrap())
        .build()
        .unwrap()
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let body_start = head_end + 4;
    let len = header_values(&head, "content-length")
        .first()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < body_start + len {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        head,
        body: buf[body_start..body_start + len].to_vec(),
    })
}
