//! Shared helpers for the integration tests.
//!
//! Each test spawns its own relay on an ephemeral port with a temporary
//! uploads directory.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use slidecast_relay::config::RelayConfig;
use slidecast_relay::server;
use tempfile::TempDir;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Client side of a relay WebSocket.
pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for any single frame.
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// A running relay bound to an ephemeral port.
pub struct TestServer {
    /// Bound address.
    pub addr: SocketAddr,
    /// Uploads directory; dropped with the server.
    pub uploads: TempDir,
}

impl TestServer {
    /// `http://<addr>`
    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `ws://<addr>/ws?<query>`
    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/ws?{query}", self.addr)
    }

    /// Opens a relay connection for `code` with `role`.
    pub async fn connect(&self, code: &str, role: &str) -> Client {
        let url = self.ws_url(&format!("code={code}&role={role}"));
        let Ok((client, _)) = tokio_tungstenite::connect_async(url).await else {
            panic!("failed to connect as {role} to {code}");
        };
        client
    }

    /// Connects a host and waits until it is attached.
    pub async fn connect_host(&self, code: &str) -> Client {
        let mut host = self.connect(code, "host").await;
        let presence = next_json(&mut host).await;
        assert_eq!(presence["type"], "presence");
        host
    }

    /// Connects a viewer and returns it along with its `sync` snapshot.
    pub async fn connect_viewer(&self, code: &str) -> (Client, Value) {
        let mut viewer = self.connect(code, "viewer").await;
        let sync = next_json(&mut viewer).await;
        assert_eq!(sync["type"], "sync");
        (viewer, sync)
    }
}

/// Starts a relay on `127.0.0.1:0`.
pub async fn spawn_server() -> TestServer {
    spawn_server_with(|_| {}).await
}

/// Starts a relay on `127.0.0.1:0` after letting `tweak` adjust the config.
pub async fn spawn_server_with(tweak: impl FnOnce(&mut RelayConfig)) -> TestServer {
    let Ok(uploads) = TempDir::new() else {
        panic!("tempdir");
    };
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };

    let mut config = RelayConfig {
        listen_addr: addr,
        public_base_url: format!("http://{addr}"),
        uploads_dir: uploads.path().to_path_buf(),
        ..RelayConfig::default()
    };
    tweak(&mut config);
    tokio::spawn(async move {
        let _ = server::serve_on(listener, config).await;
    });

    TestServer { addr, uploads }
}

/// Reads the next text frame as JSON, skipping pings.
pub async fn next_json(client: &mut Client) -> Value {
    loop {
        let Ok(next) = tokio::time::timeout(FRAME_TIMEOUT, client.next()).await else {
            panic!("timed out waiting for a frame");
        };
        match next {
            Some(Ok(Message::Text(text))) => {
                let Ok(value) = serde_json::from_str(text.as_str()) else {
                    panic!("frame is not JSON: {text}");
                };
                return value;
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

/// Asserts nothing arrives on `client` for a short while.
pub async fn assert_silent(client: &mut Client) {
    if let Ok(next) = tokio::time::timeout(Duration::from_millis(200), client.next()).await {
        panic!("expected no frame, got {next:?}");
    }
}

/// Sends a JSON value as a text frame.
pub async fn send_json(client: &mut Client, value: &Value) {
    send_text(client, &value.to_string()).await;
}

/// Sends a raw text frame.
pub async fn send_text(client: &mut Client, text: &str) {
    let Ok(()) = client.send(Message::text(text.to_owned())).await else {
        panic!("send failed");
    };
}
