//! Supply Chain Rescue server binary.
//!
//! Wires configuration, logging, the language collaborator, the shared
//! snapshot, the broadcast timers, and the dashboard HTTP server, then
//! runs until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `rescue-config.yaml`, then apply `PORT`,
//!    `RESCUE_HOST`, `LLM_*`, and `GEMINI_API_KEY` overrides
//! 2. Initialize structured logging (tracing)
//! 3. Build the language collaborator
//! 4. Seed the snapshot and shared state
//! 5. Start the broadcast timers
//! 6. Serve the dashboard API until shutdown

mod error;

use std::path::Path;
use std::sync::Arc;

use rescue_api::{AppState, spawn_broadcast_loop, spawn_server};
use rescue_core::{LogFormat, RescueConfig};
use rescue_llm::LanguageClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ServerBinError;

/// Path of the optional YAML config, relative to the working directory.
const CONFIG_PATH: &str = "rescue-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step fails or the server stops
/// abnormally.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = RescueConfig::load_or_default(Path::new(CONFIG_PATH))
        .map_err(ServerBinError::from)?;

    // 2. Initialize structured logging.
    init_tracing(&config);
    info!(
        host = config.server.host,
        port = config.server.port,
        metrics_interval_ms = config.simulation.metrics_interval_ms,
        alert_interval_ms = config.simulation.alert_interval_ms,
        seed = ?config.simulation.seed,
        "rescue-server starting"
    );

    // 3. Build the language collaborator.
    let collaborator = LanguageClient::from_config(&config.llm).map_err(ServerBinError::from)?;
    info!(backend = collaborator.backend_name(), "Collaborator ready");

    // 4. Seed the snapshot.
    let state = Arc::new(AppState::seeded(collaborator, config.simulation.clone()));
    info!("Snapshot seeded");

    // 5. Start the broadcast timers.
    let timers = spawn_broadcast_loop(&state);

    // 6. Serve until Ctrl-C.
    let server = spawn_server(&config.server, Arc::clone(&state), shutdown_signal())
        .map_err(ServerBinError::from)?;
    let outcome = server.await;
    timers.abort();

    match outcome {
        Ok(result) => result.map_err(ServerBinError::from)?,
        Err(e) => {
            return Err(ServerBinError::Join {
                message: e.to_string(),
            }
            .into());
        }
    }

    info!("rescue-server shutdown complete");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_tracing(config: &RescueConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed the server
/// runs until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
