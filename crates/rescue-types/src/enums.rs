//! Enumeration types for the supply chain snapshot.
//!
//! Every enum serializes to the lowercase (or `snake_case`) string the
//! dashboard renders directly, e.g. `"in_progress"` or `"critical"`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Stock health of an inventory line.
///
/// Always derived from `current` and `threshold` via
/// [`StockStatus::for_levels`]; never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum StockStatus {
    /// At or above the reorder threshold.
    Optimal,
    /// Below the threshold but at least half of it.
    Low,
    /// Below half of the threshold.
    Critical,
}

impl StockStatus {
    /// Classify a stock level against its reorder threshold.
    ///
    /// `current < threshold / 2` is critical, `current < threshold` is
    /// low, anything else is optimal. Computed in `u64` so doubling the
    /// stock level cannot overflow.
    pub fn for_levels(current: u32, threshold: u32) -> Self {
        let doubled = u64::from(current).saturating_mul(2);
        if doubled < u64::from(threshold) {
            Self::Critical
        } else if current < threshold {
            Self::Low
        } else {
            Self::Optimal
        }
    }
}

// ---------------------------------------------------------------------------
// Suppliers
// ---------------------------------------------------------------------------

/// Where a supplier sits in the negotiation lifecycle.
///
/// `pending -> active | in_progress -> completed | failed`. Only the move
/// into `in_progress` is driven by this service (a successful negotiate
/// call); the rest are seeded or set externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NegotiationStatus {
    /// No negotiation opened yet.
    Pending,
    /// Standing contract, open to renegotiation.
    Active,
    /// A negotiation round has been scored and is awaiting the supplier.
    InProgress,
    /// Terms agreed.
    Completed,
    /// Negotiation abandoned.
    Failed,
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Shipping route status.
///
/// `active -> delayed | completed`, `delayed -> rerouted`. `rerouted` and
/// `completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RouteStatus {
    /// In transit and advancing.
    Active,
    /// Held up; eligible for rerouting.
    Delayed,
    /// Switched to an alternative path.
    Rerouted,
    /// Arrived.
    Completed,
}

/// Delivery risk attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RiskLevel {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

/// Weather draw used by route optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum WeatherOutlook {
    /// Good conditions; a rerouted shipment drops to low risk.
    Favorable,
    /// Poor conditions; a rerouted shipment stays at medium risk.
    Challenging,
}

/// Traffic draw used by route optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TrafficLevel {
    /// Light traffic.
    Light,
    /// Heavy traffic.
    Heavy,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Visual category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AlertType {
    /// Needs immediate attention.
    Critical,
    /// Something is off.
    Warning,
    /// An automated action completed.
    Success,
    /// Informational.
    Info,
}

/// Triage priority of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AlertPriority {
    /// High priority.
    High,
    /// Medium priority.
    Medium,
    /// Low priority.
    Low,
}
