//! Server startup helper.
//!
//! [`spawn_server`] validates the listen address eagerly, then runs the
//! HTTP server on a background task so the binary can own shutdown.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use rescue_core::config::ServerSection;

use crate::server::{ServerError, socket_addr, start_server};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the dashboard HTTP server on a background Tokio task.
///
/// The task resolves to the server's own result once `shutdown`
/// completes, so the caller can await it for a clean exit.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address does not
/// parse. Bind failures surface through the task's result.
pub fn spawn_server(
    config: &ServerSection,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), ServerError>>, StartupError> {
    let addr = socket_addr(config)?;
    let config = config.clone();

    let handle = tokio::spawn(async move { start_server(&config, state, shutdown).await });

    tracing::info!(%addr, "Dashboard server spawned on background task");
    Ok(handle)
}
