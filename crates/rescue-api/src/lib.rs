//! Dashboard API server for Supply Chain Rescue.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for reading the snapshot and running commands
//!   (restock, negotiate, optimize route, chat)
//! - **`WebSocket` push channel** (`/ws`) that sends the full snapshot on
//!   connect and then every broadcast, and accepts the same commands as
//!   inbound frames
//! - **Broadcast loop** timers that drift the snapshot and push
//!   `metrics_update` and `alert_raised` frames
//!
//! # Architecture
//!
//! One [`AppState`] holds the snapshot behind a `tokio` read-write lock.
//! Snapshot logic lives in `rescue-core` as plain functions; this crate
//! only decides locking, broadcasting, and transport. The lock is never
//! held across a collaborator call or a socket write.

pub mod broadcast_loop;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use broadcast_loop::{BroadcastLoop, spawn_broadcast_loop};
pub use error::ApiError;
pub use registry::{Connection, ConnectionId, ConnectionRegistry};
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::{StartupError, spawn_server};
pub use state::AppState;
