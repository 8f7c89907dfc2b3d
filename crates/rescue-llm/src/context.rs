//! Owned views of the snapshot handed to the collaborator.
//!
//! Built while the snapshot lock is held, then used after it is released,
//! so a slow collaborator never blocks readers or the mutator.

use rust_decimal::Decimal;
use serde::Serialize;

use rescue_types::{Supplier, SupplyChainSnapshot};

/// Dashboard state quoted in chat prompts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatContext {
    /// Total value of stock on hand.
    pub total_inventory_value: Decimal,
    /// Suppliers with a live contract.
    pub active_suppliers: u32,
    /// Aggregate risk in `[0, 10]`.
    pub risk_score: f64,
    /// Share of automated decisions, percent.
    pub automation_level_pct: f64,
    /// Inventory lines in critical status.
    pub critical_items: Vec<CriticalLine>,
}

/// A critical inventory line as quoted in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalLine {
    /// Item name.
    pub item: String,
    /// Units on hand.
    pub current: u32,
    /// Reorder threshold.
    pub threshold: u32,
}

impl ChatContext {
    /// Copy the quoted fields out of `snapshot`.
    pub fn from_snapshot(snapshot: &SupplyChainSnapshot) -> Self {
        let metrics = &snapshot.metrics;
        Self {
            total_inventory_value: metrics.total_inventory_value,
            active_suppliers: metrics.active_suppliers,
            risk_score: metrics.risk_score,
            automation_level_pct: metrics.automation_level_pct,
            critical_items: snapshot
                .critical_items()
                .map(|line| CriticalLine {
                    item: line.item.clone(),
                    current: line.current(),
                    threshold: line.threshold,
                })
                .collect(),
        }
    }
}

/// Supplier attributes and proposed terms for one negotiation round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegotiationBrief {
    /// Supplier display name.
    pub supplier: String,
    /// Rating in `[0, 5]`.
    pub rating: f64,
    /// On-time delivery rate, percent.
    pub reliability_pct: f64,
    /// Typical lead time in days.
    pub lead_time_days: u32,
    /// Proposed terms, verbatim from the caller.
    pub terms: serde_json::Value,
}

impl NegotiationBrief {
    /// Describe a round with `supplier` over `terms`.
    pub fn new(supplier: &Supplier, terms: serde_json::Value) -> Self {
        Self {
            supplier: supplier.name.clone(),
            rating: supplier.rating,
            reliability_pct: supplier.reliability_pct,
            lead_time_days: supplier.lead_time_days,
            terms,
        }
    }
}
