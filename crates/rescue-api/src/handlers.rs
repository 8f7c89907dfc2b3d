//! REST API endpoint handlers.
//!
//! Reads are served from the live snapshot under a read lock. Commands go
//! through [`crate::commands`], the same path the push channel uses, so a
//! REST restock is broadcast exactly like a push-channel one.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness and connection count |
//! | `GET` | `/api/dashboard` | Full snapshot |
//! | `GET` | `/api/inventory` | Inventory lines |
//! | `GET` | `/api/suppliers` | Suppliers |
//! | `GET` | `/api/routes` | Shipping routes |
//! | `GET` | `/api/metrics` | Headline metrics |
//! | `GET` | `/api/alerts` | Recent alerts, newest first |
//! | `POST` | `/api/inventory/{item}/restock` | Restock one line |
//! | `POST` | `/api/suppliers/{id}/negotiate` | Negotiate with a supplier |
//! | `POST` | `/api/routes/{id}/optimize` | Optimize a route |
//! | `POST` | `/api/chat` | Ask the assistant |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use validator::Validate;

use rescue_types::{
    Alert, InventoryItem, Metrics, NegotiationResult, RestockResult, Route, RouteOptimization,
    Supplier, SupplyChainSnapshot,
};

use crate::commands;
use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    /// The question for the assistant.
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness probe with the number of open dashboard connections.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "connections": state.registry.len().await,
        "collaborator": state.collaborator.backend_name(),
    }))
}

// ---------------------------------------------------------------------------
// GET snapshot views
// ---------------------------------------------------------------------------

/// The full snapshot.
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<SupplyChainSnapshot> {
    Json(state.snapshot.read().await.clone())
}

/// Inventory lines in display order.
pub async fn get_inventory(State(state): State<Arc<AppState>>) -> Json<Vec<InventoryItem>> {
    Json(state.snapshot.read().await.inventory.clone())
}

/// Suppliers in display order.
pub async fn get_suppliers(State(state): State<Arc<AppState>>) -> Json<Vec<Supplier>> {
    Json(state.snapshot.read().await.suppliers.clone())
}

/// Shipping routes in display order.
pub async fn get_routes(State(state): State<Arc<AppState>>) -> Json<Vec<Route>> {
    Json(state.snapshot.read().await.routes.clone())
}

/// Headline metrics.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<Metrics> {
    Json(state.snapshot.read().await.metrics.clone())
}

/// Recent alerts, newest first.
pub async fn get_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<Alert>> {
    Json(state.snapshot.read().await.alerts.iter().cloned().collect())
}

// ---------------------------------------------------------------------------
// POST commands
// ---------------------------------------------------------------------------

/// Restock one inventory line from the best matching supplier.
pub async fn restock_item(
    State(state): State<Arc<AppState>>,
    Path(item): Path<String>,
) -> Result<Json<RestockResult>, ApiError> {
    Ok(Json(commands::restock(&state, &item).await?))
}

/// Run a negotiation round. The optional JSON body is passed through as
/// the proposed terms. A collaborator failure still answers 200 with an
/// `error` field in the result.
pub async fn negotiate_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<NegotiationResult>, ApiError> {
    // A non-numeric id cannot name a supplier.
    let supplier_id: u32 = id
        .parse()
        .ok()
        .ok_or_else(|| ApiError::NotFound("Supplier not found".to_owned()))?;

    let terms = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::InvalidRequest(format!("terms are not valid JSON: {e}")))?
    };

    Ok(Json(commands::negotiate(&state, supplier_id, terms).await?))
}

/// Optimize one route.
pub async fn optimize_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RouteOptimization>, ApiError> {
    Ok(Json(commands::optimize_route(&state, &id).await?))
}

/// Ask the assistant a question. Always answers when the body is valid;
/// collaborator failures produce the fallback reply.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    request
        .validate()
        .map_err(|e| ApiError::InvalidRequest(format!("invalid chat request: {e}")))?;

    let response = commands::chat(&state, &request.message).await;
    Ok(Json(serde_json::json!({ "response": response })))
}
