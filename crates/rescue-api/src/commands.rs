//! Command dispatch shared by the REST endpoints and the push channel.
//!
//! Each command takes the snapshot lock only for its own mutation, releases
//! it, then broadcasts the result. The collaborator is always called with
//! no lock held. Mutation and broadcast are not atomic: a reader may see
//! the new state before the broadcast frame arrives.

use chrono::Utc;
use tracing::{debug, info, warn};
use validator::Validate;

use rescue_core::CoreError;
use rescue_core::{negotiation, restock as restocking, routing};
use rescue_llm::{ChatContext, NegotiationBrief};
use rescue_types::{ClientCommand, NegotiationResult, RestockResult, RouteOptimization, ServerEvent};

use crate::handlers::ChatRequest;
use crate::registry::ConnectionId;
use crate::state::AppState;

/// Restock an inventory line and broadcast `restock_initiated`.
pub async fn restock(state: &AppState, item: &str) -> Result<RestockResult, CoreError> {
    let result = {
        let mut snapshot = state.snapshot.write().await;
        state.with_rng(|rng| restocking::restock(&mut snapshot, item, Utc::now(), rng))?
    };

    state
        .registry
        .broadcast(&ServerEvent::RestockInitiated {
            payload: result.clone(),
        })
        .await;
    Ok(result)
}

/// Optimize a route and broadcast `route_optimized`.
pub async fn optimize_route(
    state: &AppState,
    route_id: &str,
) -> Result<RouteOptimization, CoreError> {
    let result = {
        let mut snapshot = state.snapshot.write().await;
        state.with_rng(|rng| routing::optimize_route(&mut snapshot, route_id, Utc::now(), rng))?
    };

    state
        .registry
        .broadcast(&ServerEvent::RouteOptimized {
            payload: result.clone(),
        })
        .await;
    Ok(result)
}

/// Run one negotiation round and broadcast `negotiation_update`.
///
/// An unknown supplier is [`CoreError::NotFound`] with nothing broadcast.
/// A collaborator failure is not an error here: the round is reported as
/// failed (with an `error` field), broadcast, and leaves the snapshot
/// untouched.
pub async fn negotiate(
    state: &AppState,
    supplier_id: u32,
    terms: serde_json::Value,
) -> Result<NegotiationResult, CoreError> {
    let supplier = {
        let snapshot = state.snapshot.read().await;
        negotiation::negotiation_target(&snapshot, supplier_id)?
    };

    let brief = NegotiationBrief::new(&supplier, terms);
    let result = match state.collaborator.negotiate(&brief).await {
        Ok(outcome) => {
            let mut snapshot = state.snapshot.write().await;
            negotiation::record_outcome(&mut snapshot, supplier_id, outcome, Utc::now())?
        }
        Err(e) => {
            warn!(supplier_id, error = %e, "Negotiation round failed");
            negotiation::failed_round(&supplier, Utc::now())
        }
    };

    state
        .registry
        .broadcast(&ServerEvent::NegotiationUpdate {
            payload: result.clone(),
        })
        .await;
    Ok(result)
}

/// Answer a chat question. Never fails: collaborator problems produce the
/// fallback reply.
pub async fn chat(state: &AppState, message: &str) -> String {
    let context = {
        let snapshot = state.snapshot.read().await;
        ChatContext::from_snapshot(&snapshot)
    };
    state.collaborator.chat_or_fallback(message, &context).await
}

/// Handle one inbound push-channel frame from `connection`.
///
/// Returns the frame to send back to that connection only, if any.
/// Successful mutating commands reply through their broadcast instead.
/// Malformed input and unknown kinds produce exactly one `error` frame
/// and touch nothing.
pub async fn handle_frame(
    state: &AppState,
    connection: ConnectionId,
    text: &str,
) -> Option<ServerEvent> {
    let command = match parse_frame(text) {
        Ok(command) => command,
        Err(reply) => {
            debug!(connection_id = %connection, "Rejected inbound frame");
            return Some(reply);
        }
    };

    info!(connection_id = %connection, command = command_kind(&command), "Inbound command");

    match command {
        ClientCommand::Chat { message } => {
            let request = ChatRequest { message };
            if let Err(e) = request.validate() {
                return Some(ServerEvent::error(format!("Invalid chat message: {e}")));
            }
            Some(ServerEvent::ChatResponse {
                message: chat(state, &request.message).await,
            })
        }
        ClientCommand::Negotiate { supplier_id, terms } => {
            negotiate(state, supplier_id, terms).await.err().map(error_reply)
        }
        ClientCommand::OptimizeRoute { route_id } => {
            optimize_route(state, &route_id).await.err().map(error_reply)
        }
        ClientCommand::RequestRestock { item } => {
            restock(state, &item).await.err().map(error_reply)
        }
    }
}

/// Decode a frame, distinguishing bad JSON, unknown kinds, and bad fields.
fn parse_frame(text: &str) -> Result<ClientCommand, ServerEvent> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ServerEvent::error(format!("Invalid message format: {e}")))?;

    let kind = value
        .get("kind")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    if !ClientCommand::KINDS.contains(&kind) {
        return Err(ServerEvent::error(format!("Unknown message type: {kind:?}")));
    }

    let kind = kind.to_owned();
    serde_json::from_value(value)
        .map_err(|e| ServerEvent::error(format!("Invalid {kind} message: {e}")))
}

const fn command_kind(command: &ClientCommand) -> &'static str {
    match command {
        ClientCommand::Chat { .. } => "chat",
        ClientCommand::Negotiate { .. } => "negotiate",
        ClientCommand::OptimizeRoute { .. } => "optimize_route",
        ClientCommand::RequestRestock { .. } => "request_restock",
    }
}

fn error_reply(error: CoreError) -> ServerEvent {
    ServerEvent::error(error.to_string())
}
