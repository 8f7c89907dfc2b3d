//! Synthetic alert generator.
//!
//! Every alert tick rolls once; on success one alert drawn from a fixed
//! message pool is appended to the snapshot's bounded alert log.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use rescue_types::{Alert, AlertPriority, AlertType, SupplyChainSnapshot};

/// Messages the generator picks from.
pub const ALERT_MESSAGES: [&str; 5] = [
    "New supplier contract automatically negotiated",
    "Route optimization saved $3,200 in shipping costs",
    "Inventory reorder triggered for critical items",
    "Weather alert: potential delays on eastern routes",
    "AI detected market price fluctuation opportunity",
];

const ALERT_TYPES: [AlertType; 3] = [AlertType::Warning, AlertType::Info, AlertType::Success];

const ALERT_PRIORITIES: [AlertPriority; 3] =
    [AlertPriority::High, AlertPriority::Medium, AlertPriority::Low];

/// Roll for a synthetic alert. With probability `chance`, append one to the
/// snapshot and return a copy for broadcasting.
pub fn maybe_raise_alert(
    snapshot: &mut SupplyChainSnapshot,
    chance: f64,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Option<Alert> {
    if !rng.random_bool(chance) {
        return None;
    }

    let alert_type = *ALERT_TYPES.choose(rng)?;
    let priority = *ALERT_PRIORITIES.choose(rng)?;
    let message = *ALERT_MESSAGES.choose(rng)?;

    let alert = snapshot.raise_alert(alert_type, priority, message, now);
    tracing::debug!(
        alert_id = %alert.id,
        alert_type = ?alert.alert_type,
        "Synthetic alert raised"
    );
    Some(alert)
}
