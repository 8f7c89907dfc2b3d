//! Command results and the frames exchanged over the push channel.
//!
//! Outbound frames are internally tagged by `kind`:
//!
//! ```json
//! {"kind": "metrics_update", "payload": { "riskScore": 2.4, ... }}
//! {"kind": "error", "message": "Unknown message type: dance"}
//! ```
//!
//! Inbound frames use the same `kind` discriminator with the command's
//! fields alongside it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{RouteStatus, TrafficLevel, WeatherOutlook};
use crate::structs::{Alert, Metrics, SupplyChainSnapshot};

// ---------------------------------------------------------------------------
// Command results
// ---------------------------------------------------------------------------

/// Declared-random inputs drawn for one route optimization.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct OptimizationFactors {
    /// Weather draw.
    pub weather: WeatherOutlook,
    /// Traffic draw.
    pub traffic: TrafficLevel,
    /// Fuel cost index in `[50, 150)`.
    pub fuel_costs: f64,
    /// Number of alternative paths found, `1..=3`.
    pub alternative_routes: u32,
}

/// Result of `optimize-route`.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RouteOptimization {
    /// The optimized route.
    pub route_id: String,
    /// Inputs that drove the decision.
    pub optimization_factors: OptimizationFactors,
    /// Route status after optimization.
    pub new_status: RouteStatus,
    /// Estimated savings in dollars.
    #[ts(as = "String")]
    pub estimated_savings: Decimal,
    /// When the optimization ran.
    pub timestamp: DateTime<Utc>,
}

/// Result of `restock`.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RestockResult {
    /// Restocked inventory line.
    pub item: String,
    /// Units ordered.
    pub quantity: u32,
    /// Name of the selected supplier.
    pub supplier: String,
    /// Estimated order cost in dollars.
    #[ts(as = "String")]
    pub estimated_cost: Decimal,
    /// Expected delivery time (now plus the supplier's lead time).
    pub expected_delivery: DateTime<Utc>,
    /// When the order was placed.
    pub timestamp: DateTime<Utc>,
}

/// Structured negotiation verdict returned by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NegotiationOutcome {
    /// Chance the supplier accepts the proposed terms, percent in `[0, 100]`.
    pub acceptance_likelihood: f64,
    /// Suggested counter-offer.
    pub counter_offer: String,
    /// Recommended negotiation strategy.
    pub strategy: String,
    /// Estimated savings, percent of contract value (non-negative).
    pub estimated_savings: f64,
}

/// Result of `negotiate`.
///
/// Exactly one of `negotiation_result` and `error` is present. A failed
/// collaborator call is reported through `error` rather than as a
/// transport-level failure.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NegotiationResult {
    /// Supplier negotiated with.
    pub supplier_id: u32,
    /// Supplier display name.
    pub supplier: String,
    /// Scored outcome, when the collaborator answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub negotiation_result: Option<NegotiationOutcome>,
    /// Failure description, when it did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
    /// When the negotiation round finished.
    pub timestamp: DateTime<Utc>,
}

impl NegotiationResult {
    /// A successful round.
    pub fn scored(
        supplier_id: u32,
        supplier: impl Into<String>,
        outcome: NegotiationOutcome,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            supplier_id,
            supplier: supplier.into(),
            negotiation_result: Some(outcome),
            error: None,
            timestamp,
        }
    }

    /// A round the collaborator could not score.
    pub fn failed(supplier_id: u32, supplier: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            supplier_id,
            supplier: supplier.into(),
            negotiation_result: None,
            error: Some("Negotiation failed".to_owned()),
            timestamp,
        }
    }

    /// Whether the collaborator failed to score this round.
    pub const fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

// ---------------------------------------------------------------------------
// Push channel frames
// ---------------------------------------------------------------------------

/// A frame sent from the server to a dashboard connection.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ServerEvent {
    /// Full snapshot, sent once when a connection registers.
    Initial {
        /// The whole snapshot.
        payload: SupplyChainSnapshot,
    },
    /// Periodic metrics refresh.
    MetricsUpdate {
        /// Current metrics.
        payload: Metrics,
    },
    /// A negotiation round finished (successfully or not).
    NegotiationUpdate {
        /// The round's result.
        payload: NegotiationResult,
    },
    /// A route was optimized.
    RouteOptimized {
        /// The optimization result.
        payload: RouteOptimization,
    },
    /// A restock order was placed.
    RestockInitiated {
        /// The order.
        payload: RestockResult,
    },
    /// The alert generator raised a new alert.
    AlertRaised {
        /// The new alert.
        payload: Alert,
    },
    /// Reply to a chat frame, sent only to the asking connection.
    ChatResponse {
        /// Assistant reply text.
        message: String,
    },
    /// The inbound frame could not be handled.
    Error {
        /// What went wrong.
        message: String,
    },
}

impl ServerEvent {
    /// The `kind` discriminator this event serializes with.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Initial { .. } => "initial",
            Self::MetricsUpdate { .. } => "metrics_update",
            Self::NegotiationUpdate { .. } => "negotiation_update",
            Self::RouteOptimized { .. } => "route_optimized",
            Self::RestockInitiated { .. } => "restock_initiated",
            Self::AlertRaised { .. } => "alert_raised",
            Self::ChatResponse { .. } => "chat_response",
            Self::Error { .. } => "error",
        }
    }

    /// Build an error frame.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// A frame sent from a dashboard connection to the server.
#[derive(Debug, Clone, PartialEq, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ClientCommand {
    /// Ask the assistant a question.
    Chat {
        /// The question.
        message: String,
    },
    /// Open a negotiation round with a supplier.
    Negotiate {
        /// Supplier to negotiate with.
        #[serde(rename = "supplierId")]
        supplier_id: u32,
        /// Proposed terms, passed to the collaborator verbatim.
        #[serde(default)]
        terms: serde_json::Value,
    },
    /// Try to optimize a route.
    OptimizeRoute {
        /// Route to optimize.
        #[serde(rename = "routeId")]
        route_id: String,
    },
    /// Restock an inventory line.
    RequestRestock {
        /// Inventory item name.
        item: String,
    },
}

impl ClientCommand {
    /// Every `kind` value the server accepts.
    pub const KINDS: [&'static str; 4] = ["chat", "negotiate", "optimize_route", "request_restock"];
}
