use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::session::Session;
use crate::state::AppState;

/// GET /ws -- upgrade to a WebSocket that receives every session change.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.session))
}

/// Manage a single connection after upgrade.
///
/// The current session view is queued as the first frame; later views
/// follow on the same channel in mutation order. Inbound frames other than
/// Close are ignored; actions are posted over HTTP.
async fn handle_socket(socket: WebSocket, session: Session) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let ws_manager = session.ws_manager();
    let mut rx = session.connect(conn_id.clone()).await;
    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    let open_for = ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(
        conn_id = %conn_id,
        open_secs = open_for.map(|d| d.num_seconds()),
        "WebSocket disconnected"
    );
}
