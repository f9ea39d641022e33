//! Shared fixtures for the integration tests.
//!
//! Each test starts its own server on a dedicated port so the tests can run
//! in parallel.

#![allow(dead_code)]

use std::{
    net::TcpStream,
    path::PathBuf,
    thread,
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use sketchroom_server::{ServerArgs, run_server};
use tokio::net::TcpStream as TokioTcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<TokioTcpStream>>;

/// A server running on a background thread for the rest of the test process.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Start a server on `port` and wait until it accepts connections.
    pub fn start(port: u16) -> Self {
        let args = ServerArgs {
            host: "127.0.0.1".to_string(),
            port,
            topics_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../sample/topic"),
        };

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("Failed to build runtime");
            runtime.block_on(async move {
                if let Err(e) = run_server(args).await {
                    panic!("Test server on port {} failed: {}", port, e);
                }
            });
        });

        for _ in 0..100 {
            if TcpStream::connect(("127.0.0.1", port)).is_ok() {
                return Self { port };
            }
            thread::sleep(Duration::from_millis(50));
        }
        panic!("Test server on port {} did not start", port);
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self, channel: &str, room_id: &str, user_id: &str) -> String {
        format!(
            "ws://127.0.0.1:{}/ws/{}/{}?userId={}",
            self.port, channel, room_id, user_id
        )
    }

    /// Create a room and return its id.
    pub async fn create_room(&self, client: &reqwest::Client, name: &str) -> String {
        let body: serde_json::Value = client
            .post(format!("{}/room/create", self.base_url()))
            .json(&serde_json::json!({"roomName": name}))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");
        assert_eq!(body["result"], true);
        body["roomId"].as_str().expect("roomId").to_string()
    }

    /// Join a room and return the new user id.
    pub async fn join_room(&self, client: &reqwest::Client, room_id: &str, name: &str) -> String {
        let body: serde_json::Value = client
            .post(format!("{}/room/join", self.base_url()))
            .json(&serde_json::json!({"roomId": room_id, "userName": name, "role": "player"}))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");
        assert_eq!(body["result"], true);
        body["userId"].as_str().expect("userId").to_string()
    }

    /// Open a WebSocket on the room or draw channel.
    pub async fn connect(&self, channel: &str, room_id: &str, user_id: &str) -> WsStream {
        let (ws, _) = connect_async(self.ws_url(channel, room_id, user_id))
            .await
            .expect("Failed to connect");
        ws
    }
}

/// Send a JSON value as a text frame.
pub async fn send_json(ws: &mut WsStream, value: serde_json::Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Next non-control frame, or `None` if nothing arrives within the timeout.
pub async fn next_frame(ws: &mut WsStream) -> Option<Message> {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .ok()??
            .ok()?;
        if !matches!(msg, Message::Ping(_) | Message::Pong(_)) {
            return Some(msg);
        }
    }
}

/// Next text frame parsed as JSON.
pub async fn next_json(ws: &mut WsStream) -> serde_json::Value {
    match next_frame(ws).await {
        Some(Message::Text(text)) => serde_json::from_str(text.as_str()).expect("Failed to parse JSON"),
        other => panic!("Expected a text frame, got {:?}", other),
    }
}

/// Wait until the server has attached the connection.
///
/// The server reads the ping only after attaching, so the pong proves it.
pub async fn wait_attached(ws: &mut WsStream) {
    ws.send(Message::Ping(Vec::new().into()))
        .await
        .expect("Failed to send ping");
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("Timed out waiting for pong")
            .expect("Connection closed")
            .expect("WebSocket error");
        if matches!(msg, Message::Pong(_)) {
            return;
        }
    }
}

/// Assert that no frame arrives for a short while.
pub async fn assert_silent(ws: &mut WsStream) {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(300);
    while let Ok(msg) = tokio::time::timeout_at(deadline, ws.next()).await {
        match msg {
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            other => panic!("Expected no frame, got {:?}", other),
        }
    }
}
