//! Home screen: tabs, genre filter, list and details

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use crate::cli::tui::app::{App, InputMode};
use crate::cli::tui::utils::{base_style, border_style, color, truncate_str};
use crate::domain::{ContentTab, Library, Palette, Selection};

/// Draw the home layout
pub fn draw(frame: &mut Frame, app: &App, library: &Library) {
    let palette = app.palette();
    let area = frame.area();
    frame.render_widget(Block::default().style(base_style(palette)), area);

    let selection = app.selection_state().apply(library);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Tabs + genre
            Constraint::Min(8),    // List + details
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[2]);

    draw_header(frame, app, library, rows[0]);
    draw_tabs(frame, app, &selection, rows[1]);
    draw_list(frame, app, &selection, columns[0]);
    draw_details(frame, app, &selection, columns[1]);
    draw_status_bar(frame, app, rows[3]);
}

fn draw_header(frame: &mut Frame, app: &App, library: &Library, area: Rect) {
    let palette = app.palette();
    let config = library.config();
    let title = if config.header.title.is_empty() {
        config.site_title.as_str()
    } else {
        config.header.title.as_str()
    };

    let mut spans = vec![
        Span::styled(
            title.to_string(),
            Style::default()
                .fg(color(palette.accent))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", app.theme()),
            Style::default().fg(color(palette.text_secondary)),
        ),
    ];
    if config.header.show_search {
        let query = &app.selection_state().search_query;
        let text = if query.is_empty() {
            "   / Search stories and poems...".to_string()
        } else {
            format!("   / {}", query)
        };
        spans.push(Span::styled(text, Style::default().fg(color(palette.text_primary))));
    }
    let line = Line::from(spans);

    let paragraph = Paragraph::new(line).style(header_style(palette)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(border_style(palette, false)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_tabs(frame: &mut Frame, app: &App, selection: &Selection, area: Rect) {
    let palette = app.palette();
    let state = app.selection_state();

    let titles = vec![
        format!("Stories ({})", selection.stories.len()),
        format!("Poetry ({})", selection.poetries.len()),
    ];
    let selected = match state.active_tab {
        ContentTab::Stories => 0,
        ContentTab::Poetries => 1,
    };
    let genre = state.selected_genre.as_deref().unwrap_or("All genres");

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(base_style(palette))
        .highlight_style(
            Style::default()
                .fg(color(palette.accent))
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(palette, false))
                .title(format!(" Genre: {} ", genre)),
        );
    frame.render_widget(tabs, area);
}

fn draw_list(frame: &mut Frame, app: &App, selection: &Selection, area: Rect) {
    let palette = app.palette();
    let state = app.selection_state();

    let title = if state.search_query.is_empty() {
        state.active_tab.label().to_string()
    } else {
        format!("Search results for: \"{}\"", state.search_query)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(palette, true))
        .style(base_style(palette));

    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = match state.active_tab {
        ContentTab::Stories => selection
            .stories
            .iter()
            .map(|s| ListItem::new(truncate_str(&s.title, width)))
            .collect(),
        ContentTab::Poetries => selection
            .poetries
            .iter()
            .map(|p| ListItem::new(truncate_str(&p.title, width)))
            .collect(),
    };

    if items.is_empty() {
        let mut message = format!("No {} found for the selected filters.", state.active_tab.label());
        if state.selected_genre.is_some() {
            message.push_str("\n\nPress x to show all genres.");
        }
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(color(palette.text_secondary)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(color(palette.bg_accent))
                .fg(color(palette.text_primary))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(app.list_index()));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_details(frame: &mut Frame, app: &App, selection: &Selection, area: Rect) {
    let palette = app.palette();
    let label = Style::default().fg(color(palette.text_secondary));
    let title_style = Style::default()
        .fg(color(palette.accent))
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    if let Some(story) = app.selected_story(selection) {
        lines.push(Line::from(Span::styled(story.title.clone(), title_style)));
        lines.push(Line::from(Span::styled(story.byline(), label)));
        lines.push(Line::from(Span::styled(
            format!("{} page(s)", story.pages.len()),
            label,
        )));
        lines.push(Line::default());
        lines.push(Line::from(story.excerpt.clone()));
    } else if let Some(poem) = app.selected_poem(selection) {
        lines.push(Line::from(Span::styled(poem.title.clone(), title_style)));
        lines.push(Line::from(Span::styled(poem.byline(), label)));
        lines.push(Line::default());
        for line in poem.preview_lines(4) {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        if poem.lines.len() > 4 {
            lines.push(Line::from(Span::styled("...", label)));
        }
    } else {
        lines.push(Line::from(Span::styled("Nothing selected", label)));
    }

    let paragraph = Paragraph::new(lines)
        .style(base_style(palette))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(border_style(palette, false)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Draw the status bar
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.palette();

    let (content, style) = match app.input_mode() {
        InputMode::Normal => {
            let msg = app.status_message().unwrap_or(
                "[tab]switch [g]enre [/]search [t]heme [enter]open [q]uit [?]help",
            );
            (msg.to_string(), Style::default().fg(color(palette.text_secondary)))
        }
        InputMode::Search => (
            format!("Search: {}_", app.selection_state().search_query),
            Style::default().fg(color(palette.accent)),
        ),
    };

    let paragraph = Paragraph::new(content).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(palette, false))
            .style(header_style(palette)),
    );

    frame.render_widget(paragraph, area);
}

fn header_style(palette: &Palette) -> Style {
    Style::default()
        .fg(color(palette.text_primary))
        .bg(color(palette.bg_secondary))
}

