//! Core entity structs for the supply chain snapshot.
//!
//! [`SupplyChainSnapshot`] is the single in-memory record the dashboard
//! reads. It is created once from seed data and mutated in place by the
//! periodic mutator and the command handlers.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use ts_rs::TS;
use uuid::Uuid;

use crate::enums::{
    AlertPriority, AlertType, NegotiationStatus, RiskLevel, RouteStatus, StockStatus,
};

/// Default number of alerts retained by an [`AlertLog`].
pub const DEFAULT_ALERT_CAPACITY: usize = 8;

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// One inventory line.
///
/// `current` and `status` are private so the status can only change
/// together with the stock level (see [`InventoryItem::set_current`]).
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct InventoryItem {
    /// Item category name (also the lookup key for restocking).
    pub item: String,
    current: u32,
    /// Reorder threshold.
    pub threshold: u32,
    /// Forecast stock level.
    pub predicted: u32,
    status: StockStatus,
}

impl InventoryItem {
    /// Create an inventory line with its status derived from the levels.
    pub fn new(item: impl Into<String>, current: u32, threshold: u32, predicted: u32) -> Self {
        Self {
            item: item.into(),
            current,
            threshold,
            predicted,
            status: StockStatus::for_levels(current, threshold),
        }
    }

    /// Units currently on hand.
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Stock health, always consistent with `current` and `threshold`.
    pub const fn status(&self) -> StockStatus {
        self.status
    }

    /// Replace the stock level and recompute the status.
    pub fn set_current(&mut self, current: u32) {
        self.current = current;
        self.status = StockStatus::for_levels(self.current, self.threshold);
    }

    /// Change the reorder threshold and recompute the status.
    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold;
        self.status = StockStatus::for_levels(self.current, self.threshold);
    }
}

// ---------------------------------------------------------------------------
// Suppliers
// ---------------------------------------------------------------------------

/// A supplier in the network.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Supplier {
    /// Numeric supplier identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Rating in `[0, 5]`.
    pub rating: f64,
    /// Headquarters location.
    pub location: String,
    /// Product categories supplied, without duplicates, in seed order.
    pub products: Vec<String>,
    /// Typical lead time in days (at least 1).
    pub lead_time_days: u32,
    /// On-time delivery rate in `[0, 100]`.
    pub reliability_pct: f64,
    /// Negotiation lifecycle state.
    pub negotiation_status: NegotiationStatus,
    /// When the last negotiation round was scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub last_negotiation: Option<DateTime<Utc>>,
}

impl Supplier {
    /// Whether this supplier carries `item`.
    ///
    /// Matches when any product name contains the item name or the item
    /// name contains the product name, ignoring case.
    pub fn supplies(&self, item: &str) -> bool {
        let item = item.to_lowercase();
        self.products.iter().any(|product| {
            let product = product.to_lowercase();
            product.contains(&item) || item.contains(&product)
        })
    }

    /// Restock selection score: `rating * 10 + (20 - lead_time_days)`.
    pub fn restock_score(&self) -> f64 {
        self.rating.mul_add(10.0, 20.0 - f64::from(self.lead_time_days))
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// A shipping route.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Route {
    /// Route identifier (e.g. `R001`).
    pub id: String,
    /// Origin city.
    pub origin: String,
    /// Destination city.
    pub destination: String,
    /// Current status.
    pub status: RouteStatus,
    /// Estimated arrival date.
    pub eta: NaiveDate,
    /// Transit progress in `[0, 100]`.
    pub progress_pct: f64,
    /// Delivery risk.
    pub risk: RiskLevel,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Headline dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Metrics {
    /// Total value of stock on hand, in dollars.
    #[ts(as = "String")]
    pub total_inventory_value: Decimal,
    /// Suppliers with a live contract.
    pub active_suppliers: u32,
    /// Mean delivery time in days (at least 1).
    pub avg_delivery_time_days: f64,
    /// Cost savings from automation, percent in `[0, 100]`.
    pub cost_savings_pct: f64,
    /// Aggregate risk in `[0, 10]`.
    pub risk_score: f64,
    /// Share of automated decisions, percent in `[0, 100]`.
    pub automation_level_pct: f64,
    /// Orders handled since start.
    #[ts(type = "number")]
    pub orders_processed: u64,
    /// Forecast accuracy, percent in `[0, 100]`.
    pub predictive_accuracy_pct: f64,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// A dashboard alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Alert {
    /// Unique alert identifier (UUID v7, time-ordered).
    pub id: Uuid,
    /// Visual category.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Human-readable message.
    pub message: String,
    /// When the alert was raised.
    pub time: DateTime<Utc>,
    /// Triage priority.
    pub priority: AlertPriority,
}

impl Alert {
    /// Create an alert stamped with a fresh identifier.
    pub fn new(
        alert_type: AlertType,
        priority: AlertPriority,
        message: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            alert_type,
            message: message.into(),
            time,
            priority,
        }
    }
}

/// Bounded alert history, newest first.
///
/// Pushing beyond the capacity evicts the oldest entry (FIFO by
/// insertion order, not by timestamp). Serializes as a plain array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertLog {
    entries: VecDeque<Alert>,
    capacity: usize,
}

impl AlertLog {
    /// Create an empty log holding at most `capacity` alerts.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Insert `alert` as the newest entry, evicting the oldest if full.
    pub fn push(&mut self, alert: Alert) {
        self.entries.push_front(alert);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Iterate from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.entries.iter()
    }

    /// The most recently inserted alert.
    pub fn latest(&self) -> Option<&Alert> {
        self.entries.front()
    }

    /// Number of retained alerts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no alerts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_CAPACITY)
    }
}

impl Serialize for AlertLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The single live record of the supply chain.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SupplyChainSnapshot {
    /// Inventory lines in display order.
    pub inventory: Vec<InventoryItem>,
    /// Suppliers in display order.
    pub suppliers: Vec<Supplier>,
    /// Shipping routes in display order.
    pub routes: Vec<Route>,
    /// Headline counters.
    pub metrics: Metrics,
    /// Recent alerts, newest first.
    #[ts(as = "Vec<Alert>")]
    pub alerts: AlertLog,
}

impl SupplyChainSnapshot {
    /// Look up an inventory line by exact item name.
    pub fn inventory_item(&self, item: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|line| line.item == item)
    }

    /// Mutable lookup of an inventory line by exact item name.
    pub fn inventory_item_mut(&mut self, item: &str) -> Option<&mut InventoryItem> {
        self.inventory.iter_mut().find(|line| line.item == item)
    }

    /// Look up a supplier by id.
    pub fn supplier(&self, id: u32) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    /// Mutable lookup of a supplier by id.
    pub fn supplier_mut(&mut self, id: u32) -> Option<&mut Supplier> {
        self.suppliers.iter_mut().find(|s| s.id == id)
    }

    /// Look up a route by id.
    pub fn route(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    /// Mutable lookup of a route by id.
    pub fn route_mut(&mut self, id: &str) -> Option<&mut Route> {
        self.routes.iter_mut().find(|r| r.id == id)
    }

    /// Inventory lines currently in critical status.
    pub fn critical_items(&self) -> impl Iterator<Item = &InventoryItem> {
        self.inventory
            .iter()
            .filter(|line| line.status() == StockStatus::Critical)
    }

    /// Append an alert stamped at `time` and return a copy of it.
    pub fn raise_alert(
        &mut self,
        alert_type: AlertType,
        priority: AlertPriority,
        message: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Alert {
        let alert = Alert::new(alert_type, priority, message, time);
        self.alerts.push(alert.clone());
        alert
    }
}
