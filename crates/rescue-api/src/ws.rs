//! `WebSocket` push channel.
//!
//! Clients connect to `GET /ws`, receive the full snapshot as an
//! `initial` frame, then every broadcast. Inbound text frames are
//! commands, handled in arrival order by one worker task per connection
//! so a slow collaborator call never stalls delivery of broadcasts to
//! this client. A client that floods commands faster than they complete
//! gets an error frame for each one that does not fit the queue.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use rescue_types::ServerEvent;

use crate::commands;
use crate::registry::ConnectionId;
use crate::state::AppState;

/// Inbound commands a single connection may have waiting.
pub const COMMAND_QUEUE_CAPACITY: usize = 16;

/// Upgrade an HTTP request to a `WebSocket` dashboard connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Drive one connection: register, pump outbound frames, queue inbound
/// commands, unregister on exit.
async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    let registration = {
        let snapshot = state.snapshot.read().await;
        state.registry.register(&snapshot).await
    };
    let mut connection = match registration {
        Ok(connection) => connection,
        Err(e) => {
            warn!(error = %e, "Failed to serialize initial snapshot");
            return;
        }
    };
    let id = connection.id;
    debug!(connection_id = %id, "WebSocket client connected");

    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    let worker = tokio::spawn(run_commands(Arc::clone(&state), id, commands_rx));

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            // Queued frames (initial snapshot, broadcasts, direct replies).
            frame = connection.outbound.recv() => {
                let Some(frame) = frame else { break };
                if sink.send(Message::Text(frame)).await.is_err() {
                    debug!(connection_id = %id, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            // Frames from the client.
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if commands_tx.try_send(text.as_str().to_owned()).is_err() {
                            warn!(connection_id = %id, "Command queue full, rejecting frame");
                            state
                                .registry
                                .send_to(id, &ServerEvent::error("Too many pending commands"))
                                .await;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        state
                            .registry
                            .send_to(
                                id,
                                &ServerEvent::error(
                                    "Invalid message format: binary frames are not supported",
                                ),
                            )
                            .await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(connection_id = %id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(connection_id = %id, "WebSocket error: {e}");
                        break;
                    }
                    // Pings are answered by the protocol layer.
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                }
            }
        }
    }

    state.registry.unregister(id).await;
    worker.abort();
}

/// Handle queued commands for one connection, one at a time, and queue any
/// direct reply back to it. Returns once the queue's sender is dropped.
pub async fn run_commands(
    state: Arc<AppState>,
    id: ConnectionId,
    mut queue: mpsc::Receiver<String>,
) {
    while let Some(text) = queue.recv().await {
        if let Some(reply) = commands::handle_frame(&state, id, &text).await {
            state.registry.send_to(id, &reply).await;
        }
    }
}
