//! Hard-coded starting snapshot.
//!
//! The dashboard boots from this data. Route ETAs are expressed relative
//! to the start date so a freshly started demo never shows stale dates,
//! and every inventory status is derived from its levels rather than
//! copied, so the status invariant holds from the first read.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::enums::{AlertPriority, AlertType, NegotiationStatus, RiskLevel, RouteStatus};
use crate::structs::{
    Alert, AlertLog, InventoryItem, Metrics, Route, Supplier, SupplyChainSnapshot,
};

/// Build the starting snapshot with an alert log of `alert_capacity`.
pub fn seed_snapshot(now: DateTime<Utc>, alert_capacity: usize) -> SupplyChainSnapshot {
    let today = now.date_naive();

    SupplyChainSnapshot {
        inventory: seed_inventory(),
        suppliers: seed_suppliers(),
        routes: seed_routes(today),
        metrics: seed_metrics(),
        alerts: seed_alerts(now, alert_capacity),
    }
}

fn seed_inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem::new("Electronics", 850, 1000, 850),
        InventoryItem::new("Automotive Parts", 3400, 2500, 3100),
        InventoryItem::new("Food Products", 890, 1200, 1400),
        InventoryItem::new("Pharmaceuticals", 2100, 1500, 1800),
        InventoryItem::new("Textiles", 650, 800, 900),
    ]
}

fn seed_suppliers() -> Vec<Supplier> {
    vec![
        supplier(
            1,
            "TechCorp Industries",
            4.8,
            "Shanghai, China",
            &["Electronics", "Components"],
            14,
            96.0,
            NegotiationStatus::Active,
        ),
        supplier(
            2,
            "AutoMax Solutions",
            4.6,
            "Detroit, USA",
            &["Auto Parts", "Steel"],
            7,
            94.0,
            NegotiationStatus::Completed,
        ),
        supplier(
            3,
            "FreshHarvest Co",
            4.2,
            "California, USA",
            &["Food", "Organic"],
            3,
            91.0,
            NegotiationStatus::Pending,
        ),
        supplier(
            4,
            "MedSupply Global",
            4.9,
            "Basel, Switzerland",
            &["Pharmaceuticals"],
            21,
            99.0,
            NegotiationStatus::Active,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn supplier(
    id: u32,
    name: &str,
    rating: f64,
    location: &str,
    products: &[&str],
    lead_time_days: u32,
    reliability_pct: f64,
    negotiation_status: NegotiationStatus,
) -> Supplier {
    let mut unique: Vec<String> = Vec::with_capacity(products.len());
    for product in products {
        if !unique.iter().any(|p| p == product) {
            unique.push((*product).to_owned());
        }
    }

    Supplier {
        id,
        name: name.to_owned(),
        rating,
        location: location.to_owned(),
        products: unique,
        lead_time_days,
        reliability_pct,
        negotiation_status,
        last_negotiation: None,
    }
}

fn seed_routes(today: NaiveDate) -> Vec<Route> {
    let in_days = |days: u64| today.checked_add_days(Days::new(days)).unwrap_or(today);

    vec![
        route(
            "R001",
            "Shanghai",
            "New York",
            RouteStatus::Active,
            in_days(6),
            67.0,
            RiskLevel::Low,
        ),
        route(
            "R002",
            "Detroit",
            "Los Angeles",
            RouteStatus::Delayed,
            in_days(3),
            45.0,
            RiskLevel::High,
        ),
        route(
            "R003",
            "California",
            "Chicago",
            RouteStatus::Completed,
            today,
            100.0,
            RiskLevel::Low,
        ),
        route(
            "R004",
            "Basel",
            "Boston",
            RouteStatus::Active,
            in_days(13),
            23.0,
            RiskLevel::Medium,
        ),
    ]
}

fn route(
    id: &str,
    origin: &str,
    destination: &str,
    status: RouteStatus,
    eta: NaiveDate,
    progress_pct: f64,
    risk: RiskLevel,
) -> Route {
    Route {
        id: id.to_owned(),
        origin: origin.to_owned(),
        destination: destination.to_owned(),
        status,
        eta,
        progress_pct,
        risk,
    }
}

fn seed_metrics() -> Metrics {
    Metrics {
        total_inventory_value: Decimal::from(2_847_520_u32),
        active_suppliers: 47,
        avg_delivery_time_days: 12.4,
        cost_savings_pct: 18.7,
        risk_score: 2.3,
        automation_level_pct: 89.0,
        orders_processed: 1247,
        predictive_accuracy_pct: 94.2,
    }
}

fn seed_alerts(now: DateTime<Utc>, capacity: usize) -> AlertLog {
    // Listed newest first; pushed oldest first so the log keeps this order.
    let seeded = [
        (
            AlertType::Critical,
            AlertPriority::High,
            "Electronics inventory below reorder threshold",
        ),
        (
            AlertType::Warning,
            AlertPriority::Medium,
            "Route R002 experiencing delays due to weather",
        ),
        (
            AlertType::Success,
            AlertPriority::Low,
            "AI successfully negotiated 8% cost reduction with TechCorp",
        ),
        (
            AlertType::Info,
            AlertPriority::Low,
            "New supplier MedSupply Global added to network",
        ),
    ];

    let mut log = AlertLog::new(capacity);
    for (alert_type, priority, message) in seeded.into_iter().rev() {
        log.push(Alert::new(alert_type, priority, message, now));
    }
    log
}
