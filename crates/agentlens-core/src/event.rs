//! Event bus for agentlens using tokio::broadcast
//!
//! The TUI subscribes for redraw triggers; the poller is the only publisher.

use tokio::sync::broadcast;

/// Events emitted by the data layer
#[derive(Debug, Clone)]
pub enum DataEvent {
    /// A fetch cycle completed and the snapshot was replaced
    SnapshotUpdated,
    /// A fetch cycle failed; prior snapshot (if any) is still held
    FetchFailed(String),
    /// Poll parameters (agent or window) changed
    ParamsChanged,
}

/// Event bus for broadcasting data events
pub struct EventBus {
    sender: broadcast::Sender<DataEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (64 events)
    pub fn default_capacity() -> Self {
        Self::new(64)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: DataEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<DataEvent> {
        self.sender.subscribe()
    }

    /// Get current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
