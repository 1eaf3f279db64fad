//! agentlens-tui - TUI frontend for agentlens using Ratatui

pub mod app;
pub mod theme;
pub mod ui;

pub use app::App;

use agentlens_core::{Poller, SnapshotStore, TrailingWindow};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Run the dashboard until the user quits
///
/// The poller is already running when we get it; this loop only consumes
/// store updates and forwards key presses. The poller is stopped before the
/// terminal is restored so no cycle outlives the screen.
pub async fn run(
    store: Arc<SnapshotStore>,
    poller: Poller,
    agent_id: String,
    window: TrailingWindow,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, agent_id, window);

    let result = run_loop(&mut terminal, &mut app, &poller).await;

    poller.stop().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    poller: &Poller,
) -> Result<()> {
    loop {
        // Apply any data events before drawing
        app.poll_events();

        terminal.draw(|f| ui::render(f, app))?;

        // Handle input with timeout for event polling
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, poller);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
