//! Story and poem reading screens

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::cli::tui::utils::{base_style, border_style, color};
use crate::domain::{BlockKind, ContentBlock, Page, Palette, Placement, Poetry, Story};

/// Draw one page of a story
pub fn draw_story(frame: &mut Frame, palette: &Palette, story: &Story, page: usize) {
    let (body, footer) = match story.pages.get(page) {
        Some(p) => (
            page_lines(p, palette),
            format!(
                "Page {} of {}  [h/l]page [t]heme [esc]back",
                page + 1,
                story.pages.len()
            ),
        ),
        None => (
            vec![Line::from(Span::styled(
                "This story has no pages.",
                Style::default().fg(color(palette.text_secondary)),
            ))],
            "[esc]back".to_string(),
        ),
    };

    let mut lines = title_lines(palette, &story.title, story.byline());
    lines.extend(body);

    draw_document(frame, palette, lines, &footer, 0);
}

/// Draw a poem, scrolled down by `scroll` lines
pub fn draw_poem(frame: &mut Frame, palette: &Palette, poem: &Poetry, scroll: u16) {
    let mut lines = title_lines(palette, &poem.title, poem.byline());
    for line in &poem.lines {
        lines.push(
            Line::from(Span::styled(
                line.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center),
        );
    }

    draw_document(frame, palette, lines, "[j/k]scroll [t]heme [esc]back", scroll);
}

fn draw_document(frame: &mut Frame, palette: &Palette, lines: Vec<Line>, footer: &str, scroll: u16) {
    let area = frame.area();
    frame.render_widget(Block::default().style(base_style(palette)), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    // Keep a readable measure on wide terminals
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Max(84),
            Constraint::Fill(1),
        ])
        .split(rows[0]);

    let paragraph = Paragraph::new(lines)
        .style(base_style(palette))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::RIGHT)
                .border_style(border_style(palette, false))
                .padding(ratatui::widgets::Padding::horizontal(2)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, columns[1]);

    let status = Paragraph::new(footer.to_string())
        .style(
            Style::default()
                .fg(color(palette.text_secondary))
                .bg(color(palette.bg_secondary)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(palette, false)),
        );
    frame.render_widget(status, rows[1]);
}

fn title_lines<'a>(palette: &Palette, title: &str, byline: String) -> Vec<Line<'a>> {
    vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(color(palette.accent))
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled(
            byline,
            Style::default().fg(color(palette.text_secondary)),
        ))
        .alignment(Alignment::Center),
        Line::default(),
    ]
}

/// Styled lines for the blocks of one page
///
/// Unrecognised block kinds are skipped. Justified text is shown left
/// aligned, as are unrecognised placements.
pub fn page_lines<'a>(page: &Page, palette: &Palette) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    for block in &page.content {
        let rendered = block_lines(block, palette);
        if rendered.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.extend(rendered);
    }

    lines
}

fn block_lines<'a>(block: &ContentBlock, palette: &Palette) -> Vec<Line<'a>> {
    let alignment = match block.placement {
        Placement::Center => Alignment::Center,
        Placement::Right => Alignment::Right,
        _ => Alignment::Left,
    };

    let (text, style) = match &block.kind {
        BlockKind::Heading => (
            block.value.clone().unwrap_or_default(),
            Style::default()
                .fg(color(palette.accent))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
        BlockKind::Subheading => (
            block.value.clone().unwrap_or_default(),
            Style::default()
                .fg(color(palette.text_primary))
                .add_modifier(Modifier::BOLD),
        ),
        BlockKind::Text => (
            block.value.clone().unwrap_or_default(),
            Style::default().fg(color(palette.text_primary)),
        ),
        BlockKind::Image => {
            let label = block
                .alt
                .as_deref()
                .or(block.src.as_deref())
                .unwrap_or("untitled");
            let mut text = format!("[Image: {}]", label);
            if let Some(caption) = block.caption.as_deref().filter(|c| !c.is_empty()) {
                text.push('\n');
                text.push_str(caption);
            }
            (
                text,
                Style::default()
                    .fg(color(palette.text_secondary))
                    .add_modifier(Modifier::ITALIC),
            )
        }
        BlockKind::Unrecognized(_) => return Vec::new(),
    };

    if text.is_empty() {
        return Vec::new();
    }

    text.split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), style)).alignment(alignment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Theme;

    fn block(kind: BlockKind, value: &str, placement: Placement) -> ContentBlock {
        ContentBlock {
            kind,
            value: Some(value.to_string()),
            placement,
            ..Default::default()
        }
    }

    #[test]
    fn blocks_map_to_aligned_lines() {
        let palette = Theme::Vintage.palette();
        let page = Page {
            id: Some(1),
            content: vec![
                block(BlockKind::Heading, "Chapter One", Placement::Center),
                block(BlockKind::Unrecognized("video".into()), "skip", Placement::Left),
                block(BlockKind::Text, "First\nSecond", Placement::Right),
            ],
        };

        let lines = page_lines(&page, &palette);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].alignment, Some(Alignment::Center));
        assert_eq!(lines[1].spans.len(), 0);
        assert_eq!(lines[2].alignment, Some(Alignment::Right));
        assert_eq!(lines[3].spans[0].content, "Second");
    }

    #[test]
    fn justify_and_unknown_placement_fall_back_left() {
        let palette = Theme::Dark.palette();
        let page = Page {
            id: None,
            content: vec![
                block(BlockKind::Text, "a", Placement::Justify),
                block(BlockKind::Text, "b", Placement::Unrecognized("diagonal".into())),
            ],
        };

        let lines = page_lines(&page, &palette);
        assert_eq!(lines[0].alignment, Some(Alignment::Left));
        assert_eq!(lines[2].alignment, Some(Alignment::Left));
    }

    #[test]
    fn image_shows_alt_then_caption() {
        let palette = Theme::Light.palette();
        let image = ContentBlock {
            kind: BlockKind::Image,
            src: Some("/castle.jpg".into()),
            caption: Some("At dusk".into()),
            ..Default::default()
        };
        let page = Page {
            id: None,
            content: vec![image],
        };

        let lines = page_lines(&page, &palette);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "[Image: /castle.jpg]");
        assert_eq!(lines[1].spans[0].content, "At dusk");
    }
}
