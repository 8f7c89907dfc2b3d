//! Shared application state for the dashboard API server.
//!
//! [`AppState`] is the explicit handle every handler and timer receives:
//! the live snapshot behind a read-write lock, the connection registry,
//! the collaborator client, and the simulation settings. There is no
//! global; tests build as many independent states as they like.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::sync::RwLock;

use rescue_core::config::SimulationSection;
use rescue_llm::LanguageClient;
use rescue_types::{SupplyChainSnapshot, seed_snapshot};

use crate::registry::ConnectionRegistry;

/// Shared state for the Axum application, injected as `State<Arc<AppState>>`.
#[derive(Debug)]
pub struct AppState {
    /// The single live snapshot.
    pub snapshot: RwLock<SupplyChainSnapshot>,
    /// Open dashboard connections.
    pub registry: ConnectionRegistry,
    /// Generative-language collaborator.
    pub collaborator: LanguageClient,
    /// Timer periods and probabilities.
    pub simulation: SimulationSection,
    rng: Mutex<SmallRng>,
}

impl AppState {
    /// Wrap an existing snapshot.
    ///
    /// The RNG is seeded from `simulation.seed` when set, otherwise from
    /// the operating system.
    pub fn new(
        snapshot: SupplyChainSnapshot,
        collaborator: LanguageClient,
        simulation: SimulationSection,
    ) -> Self {
        let rng = simulation
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        Self {
            snapshot: RwLock::new(snapshot),
            registry: ConnectionRegistry::new(),
            collaborator,
            simulation,
            rng: Mutex::new(rng),
        }
    }

    /// Start from the seed snapshot.
    pub fn seeded(collaborator: LanguageClient, simulation: SimulationSection) -> Self {
        let snapshot = seed_snapshot(Utc::now(), simulation.alert_capacity);
        Self::new(snapshot, collaborator, simulation)
    }

    /// Run `f` with the shared RNG.
    ///
    /// The guard never escapes `f`, so it is never held across an await.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut SmallRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}
