use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use roombrief_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

struct WsConnection {
    sender: WsSender,
    connected_at: Timestamp,
}

/// Tracks every open browser connection.
///
/// Thread-safe via interior `RwLock`; wrap in `Arc` to share.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection, returning how long it was open.
    pub async fn remove(&self, conn_id: &str) -> Option<chrono::Duration> {
        self.connections
            .write()
            .await
            .remove(conn_id)
            .map(|conn| chrono::Utc::now() - conn.connected_at)
    }

    /// Send a message to one connection. Returns `false` if it is unknown or
    /// its channel is closed.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        self.connections
            .read()
            .await
            .get(conn_id)
            .is_some_and(|conn| conn.sender.send(message).is_ok())
    }

    /// Send a message to every connected client.
    ///
    /// Connections whose channels are closed are skipped; their receive loop
    /// removes them.
    pub async fn broadcast(&self, message: Message) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(message.clone());
        }
    }

    /// Send a JSON text frame to every connected client.
    pub async fn broadcast_json<T: serde::Serialize>(&self, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(text) => self.broadcast(Message::Text(text.into())).await,
            Err(e) => tracing::error!(error = %e, "Failed to serialize WebSocket payload"),
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
