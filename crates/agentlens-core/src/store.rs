//! Snapshot store - the single piece of shared mutable state
//!
//! Holds the most recently merged `AnalyticsSnapshot` behind a
//! parking_lot::RwLock. The poller is the only writer; every update is a
//! wholesale replacement, so readers always see a fully formed snapshot or
//! nothing.
//!
//! Commits are ordered by cycle *start*: each cycle claims a token before
//! issuing requests, and a cycle may only settle the store if no
//! later-started cycle has settled it first. An old, slow cycle can never
//! overwrite data from a newer one, regardless of completion order.

use crate::event::{DataEvent, EventBus};
use crate::models::AnalyticsSnapshot;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Snapshot slot plus the start token of the cycle that last settled it.
/// Kept under one lock so the ordering check and the write are atomic.
#[derive(Default)]
struct Slot {
    snapshot: Option<Arc<AnalyticsSnapshot>>,
    settled_token: u64,
}

/// Central store for the merged analytics view model
pub struct SnapshotStore {
    slot: RwLock<Slot>,

    /// True until the first cycle completes (success or failure)
    loading: AtomicBool,

    /// Next cycle start token (monotonically increasing, starts at 1)
    next_token: AtomicU64,

    /// Event bus for notifying subscribers
    event_bus: EventBus,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::default()),
            loading: AtomicBool::new(true),
            next_token: AtomicU64::new(1),
            event_bus: EventBus::default_capacity(),
        }
    }

    /// Get the event bus for subscribing to updates
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Current snapshot, if any cycle has succeeded yet
    pub fn snapshot(&self) -> Option<Arc<AnalyticsSnapshot>> {
        self.slot.read().snapshot.clone()
    }

    /// True until the first cycle settles
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Claim a start token for a new fetch cycle
    pub fn begin_cycle(&self) -> u64 {
        self.next_token.fetch_add(1, Ordering::AcqRel)
    }

    /// Commit a successful cycle's snapshot
    ///
    /// Returns false (and leaves the store untouched) if a later-started
    /// cycle already settled the store.
    pub fn commit(&self, token: u64, snapshot: AnalyticsSnapshot) -> bool {
        {
            let mut slot = self.slot.write();
            if token < slot.settled_token {
                debug!(token, settled = slot.settled_token, "Discarding stale cycle result");
                return false;
            }
            slot.settled_token = token;
            slot.snapshot = Some(Arc::new(snapshot));
        }

        self.loading.store(false, Ordering::Release);
        self.event_bus.publish(DataEvent::SnapshotUpdated);
        true
    }

    /// Record a failed cycle
    ///
    /// The held snapshot is left untouched (stale data beats a blank
    /// display) but the loading flag is cleared so the UI stops spinning.
    pub fn fail(&self, token: u64, message: String) {
        let superseded = {
            let mut slot = self.slot.write();
            if token < slot.settled_token {
                true
            } else {
                slot.settled_token = token;
                false
            }
        };

        self.loading.store(false, Ordering::Release);

        if superseded {
            // A newer cycle already landed; nothing to report to the UI.
            debug!(token, "Stale cycle failure ignored");
        } else {
            warn!(token, error = %message, "Fetch cycle failed, keeping previous snapshot");
            self.event_bus.publish(DataEvent::FetchFailed(message));
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostBreakdown, RealtimeSnapshot, TrendSeries};

    fn snapshot_with_conversations(n: u64) -> AnalyticsSnapshot {
        AnalyticsSnapshot::merge(
            RealtimeSnapshot {
                active_conversations: n,
                ..Default::default()
            },
            TrendSeries::default(),
            CostBreakdown::default(),
        )
    }

    #[test]
    fn test_initial_state() {
        let store = SnapshotStore::new();
        assert!(store.snapshot().is_none());
        assert!(store.is_loading());
    }

    #[test]
    fn test_commit_replaces_snapshot() {
        let store = SnapshotStore::new();
        let token = store.begin_cycle();
        assert!(store.commit(token, snapshot_with_conversations(5)));

        assert!(!store.is_loading());
        assert_eq!(store.snapshot().unwrap().realtime.active_conversations, 5);

        let token2 = store.begin_cycle();
        assert!(store.commit(token2, snapshot_with_conversations(9)));
        assert_eq!(store.snapshot().unwrap().realtime.active_conversations, 9);
    }

    #[test]
    fn test_last_start_wins() {
        let store = SnapshotStore::new();
        let old_token = store.begin_cycle();
        let new_token = store.begin_cycle();

        // Newer cycle finishes first
        assert!(store.commit(new_token, snapshot_with_conversations(2)));
        // Older cycle arrives late and must be discarded
        assert!(!store.commit(old_token, snapshot_with_conversations(1)));

        assert_eq!(store.snapshot().unwrap().realtime.active_conversations, 2);
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let store = SnapshotStore::new();
        let token = store.begin_cycle();
        store.commit(token, snapshot_with_conversations(7));

        let token2 = store.begin_cycle();
        store.fail(token2, "costs endpoint: 500".to_string());

        assert!(!store.is_loading());
        assert_eq!(store.snapshot().unwrap().realtime.active_conversations, 7);
    }

    #[test]
    fn test_failure_clears_loading_without_snapshot() {
        let store = SnapshotStore::new();
        let token = store.begin_cycle();
        store.fail(token, "network unreachable".to_string());

        assert!(!store.is_loading());
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_commit_publishes_event() {
        let store = SnapshotStore::new();
        let mut rx = store.event_bus().subscribe();

        let token = store.begin_cycle();
        store.commit(token, snapshot_with_conversations(1));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, DataEvent::SnapshotUpdated));
    }

    #[tokio::test]
    async fn test_stale_failure_not_published() {
        let store = SnapshotStore::new();
        let old_token = store.begin_cycle();
        let new_token = store.begin_cycle();

        store.commit(new_token, snapshot_with_conversations(3));

        let mut rx = store.event_bus().subscribe();
        store.fail(old_token, "late timeout".to_string());

        // The stale failure must not surface after newer data landed
        assert!(rx.try_recv().is_err());
        assert_eq!(store.snapshot().unwrap().realtime.active_conversations, 3);
    }
}
