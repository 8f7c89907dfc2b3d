//! Axum router construction for the dashboard API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS open to any origin, since the dashboard is served elsewhere.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness
/// - `GET /ws` -- `WebSocket` push channel
/// - `GET /api/{dashboard,inventory,suppliers,routes,metrics,alerts}` -- snapshot views
/// - `POST /api/inventory/{item}/restock` -- restock
/// - `POST /api/suppliers/{id}/negotiate` -- negotiate
/// - `POST /api/routes/{id}/optimize` -- optimize route
/// - `POST /api/chat` -- assistant chat
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // WebSocket
        .route("/ws", get(ws::ws_dashboard))
        // Snapshot views
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/inventory", get(handlers::get_inventory))
        .route("/api/suppliers", get(handlers::get_suppliers))
        .route("/api/routes", get(handlers::get_routes))
        .route("/api/metrics", get(handlers::get_metrics))
        .route("/api/alerts", get(handlers::get_alerts))
        // Commands
        .route("/api/inventory/{item}/restock", post(handlers::restock_item))
        .route("/api/suppliers/{id}/negotiate", post(handlers::negotiate_supplier))
        .route("/api/routes/{id}/optimize", post(handlers::optimize_route))
        .route("/api/chat", post(handlers::chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
