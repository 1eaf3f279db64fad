//! Fetch coordinator: periodic fan-out/fan-in over the three endpoints
//!
//! One cycle issues all three requests concurrently, awaits all of them, and
//! commits the merged snapshot as a unit. Any failure abandons the cycle:
//! the error is logged and published, the loading flag clears, and the
//! previously held snapshot stays on screen.
//!
//! The loop runs a cycle immediately on spawn, then on every interval tick.
//! A parameter change resets the interval and re-runs at once; together with
//! the store's start-ordered commits, a stale-parameter cycle can never land
//! over a newer one.

use crate::client::AnalyticsClient;
use crate::error::CoreError;
use crate::event::DataEvent;
use crate::models::{AnalyticsSnapshot, TrailingWindow};
use crate::store::SnapshotStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Parameters of a fetch cycle; changing either triggers an immediate reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollParams {
    pub agent_id: String,
    pub window: TrailingWindow,
}

impl PollParams {
    pub fn new(agent_id: impl Into<String>, window: TrailingWindow) -> Self {
        Self {
            agent_id: agent_id.into(),
            window,
        }
    }
}

/// Configuration for the poller
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between periodic fetch cycles
    pub refresh_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
        }
    }
}

/// Fetch all three responses concurrently and merge them
///
/// Await-all semantics: the first error fails the join and the resolved
/// siblings' work is discarded rather than applied.
pub async fn fetch_snapshot(
    client: &AnalyticsClient,
    params: &PollParams,
) -> Result<AnalyticsSnapshot, CoreError> {
    let (realtime, trends, costs) = tokio::try_join!(
        client.realtime(&params.agent_id),
        client.trends(&params.agent_id, params.window),
        client.costs(&params.agent_id, params.window),
    )?;

    Ok(AnalyticsSnapshot::merge(realtime, trends, costs))
}

/// Run one fetch cycle against the store
pub async fn run_cycle(client: &AnalyticsClient, store: &SnapshotStore, params: &PollParams) {
    let token = store.begin_cycle();
    debug!(
        token,
        agent = %params.agent_id,
        days = params.window.days(),
        "Starting fetch cycle"
    );

    match fetch_snapshot(client, params).await {
        Ok(snapshot) => {
            if store.commit(token, snapshot) {
                debug!(token, "Snapshot committed");
            }
        }
        Err(e) => store.fail(token, e.to_string()),
    }
}

/// Handle to a running poller
///
/// Owns the background task: `stop()` shuts the loop down cleanly, and
/// dropping the handle aborts it, so no fetch outlives the owner either way.
pub struct Poller {
    params_tx: watch::Sender<PollParams>,
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn the polling loop; the first cycle runs immediately
    pub fn spawn(
        client: AnalyticsClient,
        store: Arc<SnapshotStore>,
        params: PollParams,
        config: PollerConfig,
    ) -> Self {
        let (params_tx, mut params_rx) = watch::channel(params);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.refresh_interval);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let params = params_rx.borrow().clone();
                        run_cycle(&client, &store, &params).await;
                    }
                    changed = params_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let params = params_rx.borrow_and_update().clone();
                        // Reset before re-triggering so the old schedule
                        // cannot fire alongside the new one.
                        interval.reset();
                        info!(
                            agent = %params.agent_id,
                            days = params.window.days(),
                            "Poll parameters changed, reloading"
                        );
                        store.event_bus().publish(DataEvent::ParamsChanged);
                        run_cycle(&client, &store, &params).await;
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Poller shutting down");
                        break;
                    }
                }
            }
        });

        Self {
            params_tx,
            shutdown_tx,
            task: Some(task),
        }
    }

    /// Replace the poll parameters, triggering an immediate reload
    ///
    /// No-op when the parameters are unchanged.
    pub fn set_params(&self, params: PollParams) {
        self.params_tx.send_if_modified(|current| {
            if *current == params {
                false
            } else {
                *current = params;
                true
            }
        });
    }

    /// Current poll parameters
    pub fn params(&self) -> PollParams {
        self.params_tx.borrow().clone()
    }

    /// Force an immediate cycle with the current parameters
    ///
    /// `watch::Sender::send` marks the value changed even when it is equal,
    /// which wakes the loop's changed-branch.
    pub fn refresh(&self) {
        let params = self.params_tx.borrow().clone();
        let _ = self.params_tx.send(params);
    }

    /// Stop the loop and wait for the task to finish
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_refresh_interval() {
        let config = PollerConfig::default();
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_poll_params_equality() {
        let a = PollParams::new("agent-1", TrailingWindow::Last30);
        let b = PollParams::new("agent-1", TrailingWindow::Last30);
        let c = PollParams::new("agent-1", TrailingWindow::Last7);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
