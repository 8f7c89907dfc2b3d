//! Periodic mutator: the declared-random drift applied every metrics tick.
//!
//! Each tick perturbs the headline metrics, advances active routes, and
//! consumes a little stock from a random subset of inventory lines. Every
//! value stays inside its documented range, and every stock change goes
//! through [`InventoryItem::set_current`] so the status never lags.
//!
//! All randomness comes from the caller's RNG, so a seeded
//! [`rand::rngs::SmallRng`] replays a tick exactly.

use rand::Rng;
use rust_decimal::Decimal;

use rescue_types::{InventoryItem, Metrics, Route, RouteStatus, SupplyChainSnapshot};

use crate::config::SimulationSection;

/// Largest swing of the total inventory value per tick, in dollars.
const INVENTORY_VALUE_SWING: i64 = 5_000;

/// Largest number of units consumed from one line per tick (exclusive).
const MAX_CONSUMPTION: u32 = 10;

/// Largest number of orders processed per tick (exclusive).
const MAX_NEW_ORDERS: u64 = 5;

/// Largest progress gain of an active route per tick (exclusive).
const MAX_ROUTE_PROGRESS: f64 = 2.0;

/// Summary of what one tick changed, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Routes that reached 100% and completed this tick.
    pub routes_completed: usize,
    /// Inventory lines that had stock consumed this tick.
    pub lines_consumed: usize,
}

/// Apply one full tick to the snapshot and report what moved.
pub fn apply_tick(
    snapshot: &mut SupplyChainSnapshot,
    settings: &SimulationSection,
    rng: &mut impl Rng,
) -> TickReport {
    perturb_metrics(&mut snapshot.metrics, rng);
    let routes_completed = advance_routes(&mut snapshot.routes, rng);
    let lines_consumed =
        consume_inventory(&mut snapshot.inventory, settings.consumption_chance, rng);

    TickReport {
        routes_completed,
        lines_consumed,
    }
}

/// Nudge every metric by a bounded random delta, clamped to its range.
pub fn perturb_metrics(metrics: &mut Metrics, rng: &mut impl Rng) {
    metrics.automation_level_pct =
        drift(metrics.automation_level_pct, 0.25, rng).clamp(0.0, 100.0);
    metrics.orders_processed = metrics
        .orders_processed
        .saturating_add(rng.random_range(0..MAX_NEW_ORDERS));
    metrics.risk_score = drift(metrics.risk_score, 0.2, rng).clamp(0.0, 10.0);

    let swing = Decimal::from(rng.random_range(-INVENTORY_VALUE_SWING..=INVENTORY_VALUE_SWING));
    metrics.total_inventory_value = metrics
        .total_inventory_value
        .saturating_add(swing)
        .max(Decimal::ZERO);

    metrics.avg_delivery_time_days = drift(metrics.avg_delivery_time_days, 0.25, rng).max(1.0);
    metrics.cost_savings_pct = drift(metrics.cost_savings_pct, 0.25, rng).clamp(0.0, 100.0);
    metrics.predictive_accuracy_pct =
        drift(metrics.predictive_accuracy_pct, 0.1, rng).clamp(0.0, 100.0);
}

/// Advance every active route. Routes reaching 100% become completed.
///
/// Returns how many routes completed.
pub fn advance_routes(routes: &mut [Route], rng: &mut impl Rng) -> usize {
    let mut completed = 0_usize;
    for route in routes.iter_mut().filter(|r| r.status == RouteStatus::Active) {
        route.progress_pct =
            (route.progress_pct + rng.random_range(0.0..MAX_ROUTE_PROGRESS)).min(100.0);
        if route.progress_pct >= 100.0 {
            route.status = RouteStatus::Completed;
            completed = completed.saturating_add(1);
            tracing::debug!(route_id = %route.id, "Route completed");
        }
    }
    completed
}

/// With probability `chance` per line, consume up to nine units, floored at
/// zero. Returns how many lines were touched.
pub fn consume_inventory(
    inventory: &mut [InventoryItem],
    chance: f64,
    rng: &mut impl Rng,
) -> usize {
    let mut touched = 0_usize;
    for line in inventory.iter_mut() {
        if !rng.random_bool(chance) {
            continue;
        }
        let used = rng.random_range(0..MAX_CONSUMPTION);
        line.set_current(line.current().saturating_sub(used));
        touched = touched.saturating_add(1);
    }
    touched
}

/// `value` plus a uniform delta in `[-amplitude, amplitude)`.
fn drift(value: f64, amplitude: f64, rng: &mut impl Rng) -> f64 {
    value + rng.random_range(-amplitude..amplitude)
}
