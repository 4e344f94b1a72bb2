//! Shared utilities for TUI views

use ratatui::style::{Color, Style};

use crate::domain::{Palette, Rgb};

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncate_at = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(truncate_at).collect();
        format!("{}...", truncated)
    }
}

/// Terminal colour for a palette entry
pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Base style for a panel: primary text on the primary background
pub fn base_style(palette: &Palette) -> Style {
    Style::default()
        .fg(color(palette.text_primary))
        .bg(color(palette.bg_primary))
}

/// Border style, accented when the panel has focus
pub fn border_style(palette: &Palette, focused: bool) -> Style {
    let fg = if focused { palette.accent } else { palette.border };
    Style::default().fg(color(fg)).bg(color(palette.bg_primary))
}
