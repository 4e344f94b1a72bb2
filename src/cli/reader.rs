//! Read commands: plain-text rendering of stories and poems

use anyhow::{bail, Result};
use clap::Subcommand;

use super::app::Session;
use super::output::Output;
use crate::domain::{BlockKind, ContentBlock, Page, Placement, Poetry, Story};

/// Column width used for text rendering
const TEXT_WIDTH: usize = 72;

#[derive(Subcommand)]
pub enum ReadCommands {
    /// Read a story
    Story {
        /// Story ID
        id: String,

        /// Only show this page (1-based)
        #[arg(long, short)]
        page: Option<usize>,
    },

    /// Read a poem
    Poem {
        /// Poem ID
        id: String,
    },
}

pub fn run(cmd: ReadCommands, session: &Session, output: &Output) -> Result<()> {
    let library = session.load_library()?;

    match cmd {
        ReadCommands::Story { id, page } => {
            let Some(story) = library.story(&id) else {
                bail!("Story not found: {}", id);
            };

            let pages: Vec<(usize, &Page)> = match page {
                Some(n) if n >= 1 && n <= story.pages.len() => vec![(n, &story.pages[n - 1])],
                Some(n) => bail!(
                    "Page {} is out of range; '{}' has {} page(s)",
                    n,
                    story.title,
                    story.pages.len()
                ),
                None => story.pages.iter().enumerate().map(|(i, p)| (i + 1, p)).collect(),
            };

            if output.is_json() {
                output.data(&serde_json::json!({
                    "id": story.id,
                    "title": story.title,
                    "author": story.author,
                    "genre": story.genre,
                    "publishDate": story.publish_date,
                    "coverImage": story.cover_image,
                    "pageCount": story.pages.len(),
                    "pages": pages.iter().map(|(n, p)| serde_json::json!({
                        "number": n,
                        "content": p.content,
                    })).collect::<Vec<_>>(),
                }));
            } else {
                print!("{}", render_story(story, &pages, TEXT_WIDTH));
            }
        }

        ReadCommands::Poem { id } => {
            let Some(poem) = library.poem(&id) else {
                bail!("Poem not found: {}", id);
            };

            if output.is_json() {
                output.data(poem);
            } else {
                print!("{}", render_poem(poem, TEXT_WIDTH));
            }
        }
    }

    Ok(())
}

/// Renders the title block and the given pages of a story
pub fn render_story(story: &Story, pages: &[(usize, &Page)], width: usize) -> String {
    let mut out = String::new();
    out.push_str(&title_block(&story.title, &story.byline(), width));

    if story.pages.is_empty() {
        out.push_str("\n(This story has no pages.)\n");
        return out;
    }

    for (number, page) in pages {
        out.push('\n');
        let marker = format!("~ Page {} of {} ~", number, story.pages.len());
        out.push_str(&align(&marker, width, &Placement::Center, true));
        out.push_str("\n\n");
        for line in render_page(page, width) {
            out.push_str(&line);
            out.push('\n');
        }
    }

    out
}

/// Renders a poem; empty lines stay blank
pub fn render_poem(poem: &Poetry, width: usize) -> String {
    let mut out = title_block(&poem.title, &poem.byline(), width);
    out.push('\n');
    for line in &poem.lines {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn title_block(title: &str, byline: &str, width: usize) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    if !byline.is_empty() {
        out.push_str(byline);
        out.push('\n');
    }
    out.push_str(&"=".repeat(width.min(title.chars().count().max(1))));
    out.push('\n');
    out
}

/// Renders the blocks of one page as text lines
///
/// Blocks of an unrecognised kind are skipped; unrecognised placements are
/// laid out left.
pub fn render_page(page: &Page, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for block in &page.content {
        let rendered = render_block(block, width);
        if rendered.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(rendered);
    }

    lines
}

fn render_block(block: &ContentBlock, width: usize) -> Vec<String> {
    let value = block.value.as_deref().unwrap_or("");

    match &block.kind {
        BlockKind::Heading => {
            let mut out = layout(&value.to_uppercase(), width, &block.placement);
            if !out.is_empty() {
                let rule_len = out.iter().map(|l| l.trim().chars().count()).max().unwrap_or(0);
                out.push(align(&"=".repeat(rule_len), width, &block.placement, true));
            }
            out
        }
        BlockKind::Subheading => {
            let mut out = layout(value, width, &block.placement);
            if !out.is_empty() {
                let rule_len = out.iter().map(|l| l.trim().chars().count()).max().unwrap_or(0);
                out.push(align(&"-".repeat(rule_len), width, &block.placement, true));
            }
            out
        }
        BlockKind::Text => layout(value, width, &block.placement),
        BlockKind::Image => {
            let label = block
                .alt
                .as_deref()
                .or(block.src.as_deref())
                .unwrap_or("untitled");
            let mut out = layout(&format!("[Image: {}]", label), width, &block.placement);
            if let Some(caption) = block.caption.as_deref().filter(|c| !c.is_empty()) {
                out.extend(layout(caption, width, &block.placement));
            }
            out
        }
        BlockKind::Unrecognized(_) => Vec::new(),
    }
}

fn layout(text: &str, width: usize, placement: &Placement) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let wrapped = wrap(paragraph, width);
        let count = wrapped.len();
        for (i, line) in wrapped.iter().enumerate() {
            out.push(align(line, width, placement, i + 1 == count));
        }
    }
    out
}

/// Greedy word wrap; words longer than `width` get a line of their own
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Places one wrapped line within `width`
///
/// Justified lines are stretched to the full width except the last line of
/// a paragraph, which stays left.
pub fn align(line: &str, width: usize, placement: &Placement, last_line: bool) -> String {
    let len = line.chars().count();
    if len >= width {
        return line.to_string();
    }
    let slack = width - len;

    match placement {
        Placement::Center => format!("{}{}", " ".repeat(slack / 2), line),
        Placement::Right => format!("{}{}", " ".repeat(slack), line),
        Placement::Justify if !last_line => justify(line, width),
        _ => line.to_string(),
    }
}

fn justify(line: &str, width: usize) -> String {
    let words: Vec<&str> = line.split(' ').collect();
    if words.len() < 2 {
        return line.to_string();
    }

    let letters: usize = words.iter().map(|w| w.chars().count()).sum();
    let gaps = words.len() - 1;
    let spaces = width.saturating_sub(letters);
    let base = spaces / gaps;
    let extra = spaces % gaps;

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        out.push_str(word);
        if i < gaps {
            out.push_str(&" ".repeat(base + usize::from(i < extra)));
        }
    }
    out
}
