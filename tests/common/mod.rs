//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use explorer_gateway::config::GatewayConfig;
use explorer_gateway::lifecycle::Shutdown;
use explorer_gateway::upstream::SochainClient;
use explorer_gateway::GatewayServer;

/// Paths requested from a mock upstream, in arrival order.
#[derive(Clone, Default)]
pub struct Hits(Arc<Mutex<Vec<String>>>);

impl Hits {
    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.all().iter().filter(|p| p.starts_with(prefix)).count()
    }

    fn push(&self, path: String) {
        self.0.lock().unwrap().push(path);
    }
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` receives the request path and returns status and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Hits)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Hits::default();
    let f = Arc::new(f);

    let recorded = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let Some(path) = read_request_path(&mut socket).await else {
                            return;
                        };
                        recorded.push(path.clone());

                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}

async fn read_request_path(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

/// A running gateway bound to an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Config pointing the upstream client at `upstream`.
pub fn gateway_config(upstream: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = format!("http://{}/api/v2", upstream);
    config.upstream.request_timeout_secs = 5;
    config.upstream.connect_timeout_secs = 2;
    config
}

/// Start the full gateway with a real explorer client.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let client = SochainClient::new(config.upstream.clone()).unwrap();
    let server = GatewayServer::new(config, Arc::new(client));
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestGateway {
        addr,
        shutdown,
        handle,
    }
}

/// Explorer envelope around `data`.
pub fn envelope(data: Value) -> String {
    json!({ "status": "success", "data": data }).to_string()
}

pub fn block_body(block_no: u64, time: i64, txs: &[String]) -> String {
    envelope(json!({
        "network": "BTC",
        "blockhash": "0".repeat(64),
        "block_no": block_no,
        "time": time,
        "txs": txs,
        "previous_blockhash": "prev",
        "next_blockhash": "next",
        "size": 285
    }))
}

pub fn tx_body(txid: &str, time: i64) -> String {
    envelope(json!({
        "network": "BTC",
        "txid": txid,
        "time": time,
        "fee": "0.00000000",
        "sent_value": "50.00000000",
        "inputs": [],
        "outputs": [{"output_no": 0, "address": "addr", "value": "50.00000000", "type": "pubkeyhash"}]
    }))
}

pub fn network_info_body(blocks: u64) -> String {
    envelope(json!({ "name": "Bitcoin", "acronym": "BTC", "blocks": blocks }))
}

/// A 64-character hex transaction id derived from `n`.
pub fn tx_id(n: usize) -> String {
    format!("{:064x}", n)
}
