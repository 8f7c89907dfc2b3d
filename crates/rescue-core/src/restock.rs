//! Automatic restocking.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use rescue_types::{AlertPriority, AlertType, RestockResult, Supplier, SupplyChainSnapshot};

use crate::error::CoreError;

/// Unit price range in cents, `[20.00, 70.00)` dollars.
const UNIT_PRICE_CENTS: std::ops::Range<i64> = 2_000..7_000;

/// Restock `item` from the best-scoring matching supplier.
///
/// Orders `max(threshold - current, threshold / 2)` units, adds them to the
/// line, appends a success alert, and returns the order. The snapshot is
/// untouched when the item or a supplier cannot be found.
pub fn restock(
    snapshot: &mut SupplyChainSnapshot,
    item: &str,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<RestockResult, CoreError> {
    let line = snapshot
        .inventory_item(item)
        .ok_or_else(|| CoreError::NotFound("Inventory item not found".to_owned()))?;
    let quantity = reorder_quantity(line.current(), line.threshold);

    let supplier = best_supplier(&snapshot.suppliers, item)
        .ok_or_else(|| CoreError::NotFound("No suitable suppliers found".to_owned()))?;
    let supplier_name = supplier.name.clone();
    let lead_time = TimeDelta::days(i64::from(supplier.lead_time_days));

    if let Some(line) = snapshot.inventory_item_mut(item) {
        line.set_current(line.current().saturating_add(quantity));
    }

    snapshot.raise_alert(
        AlertType::Success,
        AlertPriority::Medium,
        format!("Automatic restock initiated: {quantity} units of {item} from {supplier_name}"),
        now,
    );

    let unit_price = Decimal::new(rng.random_range(UNIT_PRICE_CENTS), 2);
    let estimated_cost = Decimal::from(quantity).saturating_mul(unit_price).floor();

    tracing::info!(
        item,
        quantity,
        supplier = %supplier_name,
        %estimated_cost,
        "Restock initiated"
    );

    Ok(RestockResult {
        item: item.to_owned(),
        quantity,
        supplier: supplier_name,
        estimated_cost,
        expected_delivery: now.checked_add_signed(lead_time).unwrap_or(now),
        timestamp: now,
    })
}

/// `max(threshold - current, floor(threshold * 0.5))`, never negative.
pub const fn reorder_quantity(current: u32, threshold: u32) -> u32 {
    let deficit = threshold.saturating_sub(current);
    let half = threshold / 2;
    if deficit > half { deficit } else { half }
}

/// Highest [`Supplier::restock_score`] among suppliers carrying `item`.
/// Ties go to the supplier listed first.
pub fn best_supplier<'a>(suppliers: &'a [Supplier], item: &str) -> Option<&'a Supplier> {
    suppliers
        .iter()
        .filter(|s| s.supplies(item))
        .fold(None, |best: Option<&Supplier>, candidate| match best {
            Some(best) if candidate.restock_score() <= best.restock_score() => Some(best),
            _ => Some(candidate),
        })
}
