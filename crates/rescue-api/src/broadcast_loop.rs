//! Timers that drift the snapshot and push the results.
//!
//! Two independent tasks: the metrics tick (mutator, then
//! `metrics_update`) and the alert tick (roll, then `alert_raised` when an
//! alert was generated). Each takes the write lock only for its mutation
//! and broadcasts after releasing it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use rescue_core::{alerts, mutator};
use rescue_types::{Alert, ServerEvent};

use crate::state::AppState;

/// Handles of the running timer tasks.
#[derive(Debug)]
pub struct BroadcastLoop {
    /// Metrics tick task.
    pub metrics: JoinHandle<()>,
    /// Alert tick task.
    pub alerts: JoinHandle<()>,
}

impl BroadcastLoop {
    /// Stop both timers.
    pub fn abort(&self) {
        self.metrics.abort();
        self.alerts.abort();
    }
}

/// Run one metrics tick. Returns how many connections got the update.
pub async fn metrics_tick(state: &AppState) -> usize {
    let (metrics, report) = {
        let mut snapshot = state.snapshot.write().await;
        let report =
            state.with_rng(|rng| mutator::apply_tick(&mut snapshot, &state.simulation, rng));
        (snapshot.metrics.clone(), report)
    };

    debug!(
        routes_completed = report.routes_completed,
        lines_consumed = report.lines_consumed,
        orders_processed = metrics.orders_processed,
        "Metrics tick applied"
    );

    state
        .registry
        .broadcast(&ServerEvent::MetricsUpdate { payload: metrics })
        .await
}

/// Run one alert tick. Returns the alert when one was raised.
pub async fn alert_tick(state: &AppState) -> Option<Alert> {
    let alert = {
        let mut snapshot = state.snapshot.write().await;
        state.with_rng(|rng| {
            alerts::maybe_raise_alert(&mut snapshot, state.simulation.alert_chance, Utc::now(), rng)
        })?
    };

    state
        .registry
        .broadcast(&ServerEvent::AlertRaised {
            payload: alert.clone(),
        })
        .await;
    Some(alert)
}

/// Spawn both timers. The first tick of each fires one full period after
/// start.
pub fn spawn_broadcast_loop(state: &Arc<AppState>) -> BroadcastLoop {
    let metrics_period = state.simulation.metrics_interval();
    let alert_period = state.simulation.alert_interval();

    let metrics_state = Arc::clone(state);
    let metrics = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(first_tick(metrics_period), metrics_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            metrics_tick(&metrics_state).await;
        }
    });

    let alert_state = Arc::clone(state);
    let alerts = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(first_tick(alert_period), alert_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            alert_tick(&alert_state).await;
        }
    });

    info!(
        metrics_interval_ms = state.simulation.metrics_interval_ms,
        alert_interval_ms = state.simulation.alert_interval_ms,
        "Broadcast loop started"
    );

    BroadcastLoop { metrics, alerts }
}

fn first_tick(period: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(period).unwrap_or(now)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rescue_core::config::SimulationSection;
    use rescue_llm::LanguageClient;

    use super::*;

    fn state(simulation: SimulationSection) -> Arc<AppState> {
        let collaborator = LanguageClient::offline(Duration::from_secs(1)).unwrap();
        Arc::new(AppState::seeded(collaborator, simulation))
    }

    fn seeded_simulation() -> SimulationSection {
        SimulationSection {
            seed: Some(7),
            ..SimulationSection::default()
        }
    }

    #[tokio::test]
    async fn metrics_tick_broadcasts_update() {
        let state = state(seeded_simulation());
        let snapshot = state.snapshot.read().await.clone();
        let mut conn = state.registry.register(&snapshot).await.unwrap();
        let _ = conn.outbound.recv().await;

        let delivered = metrics_tick(&state).await;

        assert_eq!(delivered, 1);
        let frame = conn.outbound.recv().await.unwrap();
        assert!(frame.as_str().contains("\"kind\":\"metrics_update\""));
    }

    #[tokio::test]
    async fn metrics_tick_without_clients_is_fine() {
        let state = state(seeded_simulation());
        assert_eq!(metrics_tick(&state).await, 0);
    }

    #[tokio::test]
    async fn certain_alert_tick_broadcasts_alert() {
        let state = state(SimulationSection {
            alert_chance: 1.0,
            ..seeded_simulation()
        });
        let snapshot = state.snapshot.read().await.clone();
        let mut conn = state.registry.register(&snapshot).await.unwrap();
        let _ = conn.outbound.recv().await;

        let alert = alert_tick(&state).await.unwrap();

        assert_eq!(state.snapshot.read().await.alerts.latest(), Some(&alert));
        let frame = conn.outbound.recv().await.unwrap();
        assert!(frame.as_str().contains("\"kind\":\"alert_raised\""));
    }

    #[tokio::test]
    async fn impossible_alert_tick_is_silent() {
        let state = state(SimulationSection {
            alert_chance: 0.0,
            ..seeded_simulation()
        });
        assert!(alert_tick(&state).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_loop_pushes_metrics_on_schedule() {
        let state = state(seeded_simulation());
        let snapshot = state.snapshot.read().await.clone();
        let mut conn = state.registry.register(&snapshot).await.unwrap();
        let _ = conn.outbound.recv().await;

        let handles = spawn_broadcast_loop(&state);
        let frame = conn.outbound.recv().await.unwrap();
        handles.abort();

        assert!(frame.as_str().contains("\"kind\":\"metrics_update\""));
    }
}
