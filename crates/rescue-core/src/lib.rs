//! Snapshot logic for the Supply Chain Rescue dashboard.
//!
//! Everything here is a plain function over `&mut SupplyChainSnapshot` with
//! an injected RNG and clock, so the server decides locking and timing and
//! tests can replay any operation deterministically.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`mutator`] -- Periodic metric, route, and inventory drift
//! - [`alerts`] -- Synthetic alert generator
//! - [`restock`] -- Automatic restocking from the best supplier
//! - [`routing`] -- Declared-random route optimization
//! - [`negotiation`] -- Bookkeeping around collaborator-scored negotiations
//! - [`error`] -- Core error type

pub mod alerts;
pub mod config;
pub mod error;
pub mod mutator;
pub mod negotiation;
pub mod restock;
pub mod routing;

pub use config::{ConfigError, LogFormat, RescueConfig};
pub use error::CoreError;
