//! Negotiation bookkeeping.
//!
//! A negotiation round is split in two halves around the collaborator call
//! so the snapshot is never held while waiting on the network:
//! [`negotiation_target`] copies what the prompt needs, and
//! [`record_outcome`] applies a scored verdict afterwards. A failed round
//! touches nothing.

use chrono::{DateTime, Utc};

use rescue_types::{
    AlertPriority, AlertType, NegotiationOutcome, NegotiationResult, NegotiationStatus, Supplier,
    SupplyChainSnapshot,
};

use crate::error::CoreError;

/// Copy the supplier a negotiation round is about.
pub fn negotiation_target(
    snapshot: &SupplyChainSnapshot,
    supplier_id: u32,
) -> Result<Supplier, CoreError> {
    snapshot
        .supplier(supplier_id)
        .cloned()
        .ok_or_else(|| CoreError::NotFound("Supplier not found".to_owned()))
}

/// Apply a scored outcome: the supplier moves to `in_progress`, the round
/// is timestamped, and a success alert is appended.
pub fn record_outcome(
    snapshot: &mut SupplyChainSnapshot,
    supplier_id: u32,
    outcome: NegotiationOutcome,
    now: DateTime<Utc>,
) -> Result<NegotiationResult, CoreError> {
    let supplier = snapshot
        .supplier_mut(supplier_id)
        .ok_or_else(|| CoreError::NotFound("Supplier not found".to_owned()))?;
    supplier.negotiation_status = NegotiationStatus::InProgress;
    supplier.last_negotiation = Some(now);
    let name = supplier.name.clone();

    snapshot.raise_alert(
        AlertType::Success,
        AlertPriority::Low,
        format!(
            "AI negotiation with {name} scored: {:.0}% acceptance likelihood, \
             {:.1}% estimated savings",
            outcome.acceptance_likelihood, outcome.estimated_savings
        ),
        now,
    );

    tracing::info!(
        supplier_id,
        supplier = %name,
        acceptance_likelihood = outcome.acceptance_likelihood,
        "Negotiation round recorded"
    );

    Ok(NegotiationResult::scored(supplier_id, name, outcome, now))
}

/// The result reported when the collaborator could not score a round.
pub fn failed_round(supplier: &Supplier, now: DateTime<Utc>) -> NegotiationResult {
    NegotiationResult::failed(supplier.id, supplier.name.clone(), now)
}
