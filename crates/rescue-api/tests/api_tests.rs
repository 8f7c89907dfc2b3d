//! Integration tests for the dashboard API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Each test builds its own state, seeded so the
//! declared-random commands are reproducible.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rescue_api::router::build_router;
use rescue_api::state::AppState;
use rescue_core::config::{LlmSection, SimulationSection};
use rescue_llm::{FALLBACK_CHAT_REPLY, LanguageClient};
use serde_json::Value;
use tower::ServiceExt;

fn simulation() -> SimulationSection {
    SimulationSection {
        seed: Some(2024),
        ..SimulationSection::default()
    }
}

fn make_test_state() -> Arc<AppState> {
    let collaborator = LanguageClient::offline(Duration::from_secs(1)).unwrap();
    Arc::new(AppState::seeded(collaborator, simulation()))
}

/// State whose collaborator points at a port nothing listens on.
fn make_unreachable_state() -> Arc<AppState> {
    let config = LlmSection {
        backend: "openai".to_owned(),
        api_url: "http://127.0.0.1:9".to_owned(),
        model: "test-model".to_owned(),
        api_key: Some("test".to_owned()),
        timeout_ms: 2_000,
    };
    let collaborator = LanguageClient::from_config(&config).unwrap();
    Arc::new(AppState::seeded(collaborator, simulation()))
}

async fn body_to_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let router = build_router(Arc::clone(state));
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response).await)
}

async fn post(state: &Arc<AppState>, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let router = build_router(Arc::clone(state));
    let request = Request::post(uri).header("content-type", "application/json");
    let request = match body {
        Some(json) => request.body(Body::from(json.to_owned())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response).await)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let state = make_test_state();
    let (status, json) = get(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["connections"], 0);
    assert_eq!(json["collaborator"], "offline");
}

#[tokio::test]
async fn dashboard_returns_full_snapshot() {
    let state = make_test_state();
    let (status, json) = get(&state, "/api/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inventory"].as_array().unwrap().len(), 5);
    assert_eq!(json["suppliers"].as_array().unwrap().len(), 4);
    assert_eq!(json["routes"].as_array().unwrap().len(), 4);
    assert_eq!(json["alerts"].as_array().unwrap().len(), 4);
    assert_eq!(json["metrics"]["activeSuppliers"], 47);
}

#[tokio::test]
async fn partial_views_match_snapshot() {
    let state = make_test_state();

    let (_, inventory) = get(&state, "/api/inventory").await;
    assert_eq!(inventory[0]["item"], "Electronics");
    assert_eq!(inventory[0]["status"], "low");

    let (_, suppliers) = get(&state, "/api/suppliers").await;
    assert_eq!(suppliers[0]["name"], "TechCorp Industries");
    assert_eq!(suppliers[0]["negotiationStatus"], "active");

    let (_, routes) = get(&state, "/api/routes").await;
    assert_eq!(routes[1]["id"], "R002");
    assert_eq!(routes[1]["status"], "delayed");

    let (_, metrics) = get(&state, "/api/metrics").await;
    assert_eq!(metrics["ordersProcessed"], 1247);

    let (_, alerts) = get(&state, "/api/alerts").await;
    assert_eq!(alerts[0]["type"], "critical");
}

// ---------------------------------------------------------------------------
// Restock
// ---------------------------------------------------------------------------

#[tokio::test]
async fn restock_electronics_reaches_optimal() {
    let state = make_test_state();

    let (status, json) = post(&state, "/api/inventory/Electronics/restock", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["item"], "Electronics");
    assert_eq!(json["quantity"], 500);
    assert_eq!(json["supplier"], "TechCorp Industries");

    let (_, inventory) = get(&state, "/api/inventory").await;
    assert_eq!(inventory[0]["current"], 1350);
    assert_eq!(inventory[0]["status"], "optimal");
}

#[tokio::test]
async fn restock_with_encoded_item_name() {
    let state = make_test_state();
    let (status, json) = post(&state, "/api/inventory/Food%20Products/restock", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["supplier"], "FreshHarvest Co");
}

#[tokio::test]
async fn restock_unknown_item_is_bad_request() {
    let state = make_test_state();
    let (status, json) = post(&state, "/api/inventory/Widgets/restock", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Inventory item not found");
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn restock_without_supplier_is_bad_request() {
    let state = make_test_state();
    let (status, json) = post(&state, "/api/inventory/Textiles/restock", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No suitable suppliers found");

    let (_, inventory) = get(&state, "/api/inventory").await;
    assert_eq!(inventory[4]["current"], 650);
}

// ---------------------------------------------------------------------------
// Negotiate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn negotiate_unknown_supplier_leaves_alerts_alone() {
    let state = make_test_state();
    let (_, before) = get(&state, "/api/alerts").await;

    let (status, json) = post(&state, "/api/suppliers/404/negotiate", Some("{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Supplier not found");
    let (_, after) = get(&state, "/api/alerts").await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn negotiate_non_numeric_id_is_bad_request() {
    let state = make_test_state();
    let (status, _) = post(&state, "/api/suppliers/techcorp/negotiate", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn negotiate_invalid_terms_is_bad_request() {
    let state = make_test_state();
    let (status, _) = post(&state, "/api/suppliers/1/negotiate", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn negotiate_scores_and_marks_in_progress() {
    let state = make_test_state();

    let (status, json) = post(
        &state,
        "/api/suppliers/3/negotiate",
        Some(r#"{"discount": 8, "contractMonths": 6}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["supplierId"], 3);
    assert_eq!(json["supplier"], "FreshHarvest Co");
    assert!(json["negotiationResult"]["acceptanceLikelihood"].is_number());
    assert!(json.get("error").is_none());

    let (_, suppliers) = get(&state, "/api/suppliers").await;
    assert_eq!(suppliers[2]["negotiationStatus"], "in_progress");
    assert!(suppliers[2]["lastNegotiation"].is_string());

    let (_, alerts) = get(&state, "/api/alerts").await;
    assert_eq!(alerts[0]["type"], "success");
}

#[tokio::test]
async fn negotiate_upstream_failure_reports_error_field() {
    let state = make_unreachable_state();
    let (_, alerts_before) = get(&state, "/api/alerts").await;

    let (status, json) = post(&state, "/api/suppliers/1/negotiate", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["error"], "Negotiation failed");
    assert!(json.get("negotiationResult").is_none());

    let (_, suppliers) = get(&state, "/api/suppliers").await;
    assert_eq!(suppliers[0]["negotiationStatus"], "active");
    let (_, alerts_after) = get(&state, "/api/alerts").await;
    assert_eq!(alerts_before, alerts_after);
}

// ---------------------------------------------------------------------------
// Optimize
// ---------------------------------------------------------------------------

#[tokio::test]
async fn optimize_active_route_keeps_status() {
    let state = make_test_state();

    for _ in 0..10 {
        let (status, json) = post(&state, "/api/routes/R001/optimize", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["newStatus"], "active");
        let savings: f64 = json["estimatedSavings"].as_str().unwrap().parse().unwrap();
        assert!((100.0..600.0).contains(&savings));
    }
}

#[tokio::test]
async fn optimize_delayed_route_ends_delayed_or_rerouted() {
    let state = make_test_state();
    let (status, json) = post(&state, "/api/routes/R002/optimize", None).await;
    assert_eq!(status, StatusCode::OK);

    let alternatives = json["optimizationFactors"]["alternativeRoutes"].as_u64().unwrap();
    let expected = if alternatives > 1 { "rerouted" } else { "delayed" };
    assert_eq!(json["newStatus"], expected);
}

#[tokio::test]
async fn optimize_unknown_route_is_bad_request() {
    let state = make_test_state();
    let (status, json) = post(&state, "/api/routes/R999/optimize", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Route not found");
}

#[tokio::test]
async fn alerts_never_exceed_eight() {
    let state = make_test_state();
    for _ in 0..12 {
        post(&state, "/api/routes/R004/optimize", None).await;
    }
    let (_, alerts) = get(&state, "/api/alerts").await;
    assert_eq!(alerts.as_array().unwrap().len(), 8);
    assert_eq!(alerts[0]["type"], "info");
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chat_answers_offline() {
    let state = make_test_state();
    let (status, json) = post(&state, "/api/chat", Some(r#"{"message": "forecast please"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["response"].as_str().unwrap().contains("demand"));
}

#[tokio::test]
async fn chat_upstream_failure_returns_fallback() {
    let state = make_unreachable_state();
    let (status, json) = post(&state, "/api/chat", Some(r#"{"message": "status?"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], FALLBACK_CHAT_REPLY);
}

#[tokio::test]
async fn chat_rejects_empty_message() {
    let state = make_test_state();
    let (status, json) = post(&state, "/api/chat", Some(r#"{"message": ""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn chat_rejects_missing_body() {
    let state = make_test_state();
    let (status, _) = post(&state, "/api/chat", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let state = make_test_state();
    let router = build_router(Arc::clone(&state));
    let response = router
        .oneshot(Request::get("/api/nonexistent").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
