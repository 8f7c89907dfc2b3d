//! Shared type definitions for the Supply Chain Rescue dashboard.
//!
//! This crate is the single source of truth for the snapshot model and the
//! frames exchanged with dashboard clients. Types flow downstream to
//! `TypeScript` via `ts-rs` so the browser dashboard renders exactly what
//! the server sends.
//!
//! # Modules
//!
//! - [`enums`] -- Status, risk, and alert enumerations
//! - [`structs`] -- Snapshot entities (inventory, suppliers, routes, metrics, alerts)
//! - [`events`] -- Command results plus inbound/outbound push-channel frames
//! - [`seed`] -- The hard-coded starting snapshot

pub mod enums;
pub mod events;
pub mod seed;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AlertPriority, AlertType, NegotiationStatus, RiskLevel, RouteStatus, StockStatus,
    TrafficLevel, WeatherOutlook,
};
pub use events::{
    ClientCommand, NegotiationOutcome, NegotiationResult, OptimizationFactors, RestockResult,
    RouteOptimization, ServerEvent,
};
pub use seed::seed_snapshot;
pub use structs::{
    Alert, AlertLog, DEFAULT_ALERT_CAPACITY, InventoryItem, Metrics, Route, Supplier,
    SupplyChainSnapshot,
};
