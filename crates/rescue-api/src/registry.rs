//! Registry of open dashboard connections.
//!
//! Each connection owns a bounded outbound queue drained by its socket
//! task. Broadcasting serializes the event once and offers the same frame
//! to every queue without waiting: a closed or full queue just misses
//! that frame. Nothing is retried and nothing is acknowledged.

use std::collections::BTreeMap;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};
use uuid::Uuid;

use rescue_types::{ServerEvent, SupplyChainSnapshot};

/// Frames a connection may have queued before it starts missing broadcasts.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Identifier of a registered connection (UUID v7).
pub type ConnectionId = Uuid;

/// The receiving half handed to a connection's socket task.
#[derive(Debug)]
pub struct Connection {
    /// Registry identifier, used to unregister and for direct replies.
    pub id: ConnectionId,
    /// Serialized frames to write to the socket, in order.
    pub outbound: mpsc::Receiver<Utf8Bytes>,
}

/// All currently open connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<BTreeMap<ConnectionId, mpsc::Sender<Utf8Bytes>>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and queue the full `snapshot` as its first
    /// frame (`initial`).
    pub async fn register(
        &self,
        snapshot: &SupplyChainSnapshot,
    ) -> Result<Connection, serde_json::Error> {
        let initial = encode(&ServerEvent::Initial {
            payload: snapshot.clone(),
        })?;

        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        // A fresh queue always has room for the first frame.
        let _ = tx.try_send(initial);

        let id = Uuid::now_v7();
        let mut connections = self.connections.write().await;
        connections.insert(id, tx);
        debug!(connection_id = %id, total = connections.len(), "Connection registered");

        Ok(Connection { id, outbound: rx })
    }

    /// Remove a connection. Returns whether it was registered; calling
    /// this twice is harmless.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        let removed = connections.remove(&id).is_some();
        if removed {
            debug!(connection_id = %id, total = connections.len(), "Connection unregistered");
        }
        removed
    }

    /// Offer `event` to every registered connection.
    ///
    /// Returns how many connections the frame was queued for. Zero
    /// connections is not an error.
    pub async fn broadcast(&self, event: &ServerEvent) -> usize {
        let frame = match encode(event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(kind = event.kind(), error = %e, "Failed to serialize broadcast");
                return 0;
            }
        };

        let connections = self.connections.read().await;
        let mut delivered = 0_usize;
        for (id, tx) in connections.iter() {
            match tx.try_send(frame.clone()) {
                Ok(()) => delivered = delivered.saturating_add(1),
                Err(mpsc::error::TrySendError::Full(_)) => {
                    debug!(
                        connection_id = %id,
                        kind = event.kind(),
                        "Outbound queue full, frame skipped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(
                        connection_id = %id,
                        kind = event.kind(),
                        "Connection closed, frame skipped"
                    );
                }
            }
        }
        delivered
    }

    /// Queue `event` for a single connection. Returns whether it was
    /// queued.
    pub async fn send_to(&self, id: ConnectionId, event: &ServerEvent) -> bool {
        let frame = match encode(event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(kind = event.kind(), error = %e, "Failed to serialize reply");
                return false;
            }
        };

        let connections = self.connections.read().await;
        connections
            .get(&id)
            .is_some_and(|tx| tx.try_send(frame).is_ok())
    }

    /// Number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Whether no connection is registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}

fn encode(event: &ServerEvent) -> Result<Utf8Bytes, serde_json::Error> {
    serde_json::to_string(event).map(Utf8Bytes::from)
}
