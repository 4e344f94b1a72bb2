//! Raw-mode terminal setup for the reader

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Switches to the alternate screen in raw mode with the cursor hidden
pub fn init_terminal() -> Result<Terminal> {
    terminal::enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let mut terminal = ratatui::Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

/// Leaves the alternate screen and gives the cursor back
pub fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}
