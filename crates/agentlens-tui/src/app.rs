//! TUI application state

use agentlens_core::{DataEvent, PollParams, Poller, SnapshotStore, TrailingWindow};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// TUI application state
pub struct App {
    /// Snapshot store reference
    pub store: Arc<SnapshotStore>,

    /// Event receiver for data updates
    pub event_rx: broadcast::Receiver<DataEvent>,

    /// Agent whose analytics are displayed
    pub agent_id: String,

    /// Selected trailing window
    pub window: TrailingWindow,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Last fetch failure, shown in the status line
    pub status_message: Option<String>,
}

impl App {
    pub fn new(store: Arc<SnapshotStore>, agent_id: String, window: TrailingWindow) -> Self {
        let event_rx = store.event_bus().subscribe();

        Self {
            store,
            event_rx,
            agent_id,
            window,
            should_quit: false,
            status_message: None,
        }
    }

    /// Handle keyboard input
    /// Returns true if the key was handled
    pub fn handle_key(&mut self, key: crossterm::event::KeyCode, poller: &Poller) -> bool {
        use crossterm::event::KeyCode;

        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                true
            }
            KeyCode::F(1) | KeyCode::Char('7') => {
                self.set_window(TrailingWindow::Last7, poller);
                true
            }
            KeyCode::F(2) | KeyCode::Char('3') => {
                self.set_window(TrailingWindow::Last30, poller);
                true
            }
            KeyCode::F(3) | KeyCode::Char('9') => {
                self.set_window(TrailingWindow::Last90, poller);
                true
            }
            KeyCode::Char('w') => {
                self.set_window(self.window.next(), poller);
                true
            }
            KeyCode::F(5) | KeyCode::Char('r') => {
                poller.refresh();
                true
            }
            _ => false,
        }
    }

    /// Select a window; the poller reloads immediately on change
    fn set_window(&mut self, window: TrailingWindow, poller: &Poller) {
        if self.window == window {
            return;
        }
        debug!(days = window.days(), "Window selected");
        self.window = window;
        poller.set_params(PollParams::new(self.agent_id.clone(), window));
    }

    /// Drain data events (non-blocking); redraw happens every frame anyway
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                DataEvent::SnapshotUpdated => {
                    self.status_message = None;
                }
                DataEvent::FetchFailed(msg) => {
                    self.status_message = Some(format!("Fetch failed: {}", msg));
                }
                DataEvent::ParamsChanged => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_failure_surfaces_in_status_line() {
        let store = Arc::new(SnapshotStore::new());
        let mut app = App::new(Arc::clone(&store), "agent-1".into(), TrailingWindow::Last30);

        store
            .event_bus()
            .publish(DataEvent::FetchFailed("costs: 500".into()));
        app.poll_events();

        assert_eq!(
            app.status_message.as_deref(),
            Some("Fetch failed: costs: 500")
        );

        store.event_bus().publish(DataEvent::SnapshotUpdated);
        app.poll_events();
        assert!(app.status_message.is_none());
    }
}
