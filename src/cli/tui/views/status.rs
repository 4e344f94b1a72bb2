//! Full-screen loading and error states

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::cli::tui::utils::{base_style, border_style, color};
use crate::domain::Palette;

pub fn draw_loading(frame: &mut Frame, palette: &Palette) {
    draw_centered(frame, palette, "Loading...", palette.text_secondary, None);
}

pub fn draw_error(frame: &mut Frame, palette: &Palette, message: &str) {
    draw_centered(frame, palette, message, palette.accent, Some("q: quit"));
}

fn draw_centered(
    frame: &mut Frame,
    palette: &Palette,
    message: &str,
    fg: crate::domain::Rgb,
    hint: Option<&str>,
) {
    let area = frame.area();
    frame.render_widget(Block::default().style(base_style(palette)), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(5),
            Constraint::Fill(1),
        ])
        .split(area);

    let mut lines = vec![Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(color(fg)).add_modifier(Modifier::BOLD),
    ))];
    if let Some(hint) = hint {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(color(palette.text_secondary)),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(base_style(palette))
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(border_style(palette, false)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, rows[1]);
}
