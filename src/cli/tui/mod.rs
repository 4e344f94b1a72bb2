//! Interactive terminal reader
//!
//! Browses the loaded site document with the same filter pipeline and
//! theme state the CLI commands use.

mod app;
mod event;
mod ui;
mod utils;
mod views;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use tracing::debug;

use super::app::Session;
use crate::domain::{PreferenceStore, Theme, ThemeState};
use app::App;
use event::EventHandler;

/// Which screen the reader shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Screen {
    /// Tabs, genre filter and the filtered list
    #[default]
    Home,
    /// One story, a page at a time (0-based page)
    Story { id: String, page: usize },
    /// One poem, scrolled by line
    Poem { id: String, scroll: u16 },
}

/// Launch the TUI
pub fn run(session: &Session) -> Result<()> {
    debug!("Initializing TUI");

    let mut terminal = ui::init_terminal()?;

    // The store starts out loading; show that before the fetch blocks
    let mut store = session.content_store();
    if let Err(e) = terminal.draw(|frame| views::status::draw_loading(frame, &Theme::Dark.palette())) {
        ui::restore_terminal()?;
        return Err(e.into());
    }
    store.load();
    let content = store.into_state();

    let available = match content.library() {
        Some(library) => library.config().available_themes(),
        None => Vec::new(),
    };
    let preferences: Box<dyn PreferenceStore> = Box::new(session.preference_store());
    let theme = ThemeState::init(preferences, &available);

    let mut app = App::new(content, theme, available);
    let events = EventHandler::new(session.config.tick_rate_ms);

    // Terminal is restored even if the app panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| app.run(&mut terminal, events)));

    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            }
        }
    }
}
