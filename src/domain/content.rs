//! Content document model
//!
//! The whole site is described by one JSON document with three members:
//! `config`, `stories` and `poetries`. Parsing is permissive: absent, `null`
//! or wrongly typed fields fall back to empty values, unreadable list
//! elements are dropped, and unknown block kinds or placements are kept as
//! [`BlockKind::Unrecognized`] / [`Placement::Unrecognized`]. Only input that
//! is not JSON at all fails the load.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::lenient;
use super::theme::Theme;

/// The fetched document, verbatim
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    #[serde(deserialize_with = "lenient::record")]
    pub config: SiteConfig,
    #[serde(deserialize_with = "lenient::records")]
    pub stories: Vec<Story>,
    #[serde(deserialize_with = "lenient::records")]
    pub poetries: Vec<Poetry>,
}

/// Deployment-wide settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(deserialize_with = "lenient::string")]
    pub site_title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub primary_color: String,

    /// Theme names enabled for this deployment, in picker order
    #[serde(deserialize_with = "lenient::strings")]
    pub themes: Vec<String>,

    #[serde(deserialize_with = "lenient::record")]
    pub header: HeaderConfig,

    /// Genre labels in display order
    #[serde(deserialize_with = "lenient::strings")]
    pub genres: Vec<String>,
}

impl SiteConfig {
    /// Returns the configured themes that name a known [`Theme`]
    pub fn available_themes(&self) -> Vec<Theme> {
        let mut seen = HashSet::new();
        self.themes
            .iter()
            .filter_map(|name| name.parse::<Theme>().ok())
            .filter(|theme| seen.insert(*theme))
            .collect()
    }
}

/// Header display fields, passed through to presentation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderConfig {
    #[serde(deserialize_with = "lenient::string")]
    pub logo: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub show_search: bool,
}

/// A long-form work made of pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Story {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub author: String,
    #[serde(deserialize_with = "lenient::string")]
    pub genre: String,
    #[serde(deserialize_with = "lenient::string")]
    pub publish_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub excerpt: String,
    #[serde(deserialize_with = "lenient::string")]
    pub cover_image: String,
    #[serde(deserialize_with = "lenient::records")]
    pub pages: Vec<Page>,
}

impl Story {
    /// Parsed publication date, if `publishDate` is a recognised ISO form
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_publish_date(&self.publish_date)
    }

    /// Publication date for display, or the raw value when it does not parse
    pub fn date_label(&self) -> String {
        date_label(&self.publish_date, self.published_on())
    }

    /// "by Author · Genre · Date", skipping empty parts
    pub fn byline(&self) -> String {
        join_byline(&self.author, &self.genre, &self.date_label())
    }
}

/// One page of a story
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient::records")]
    pub content: Vec<ContentBlock>,
}

/// A typed block of page content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlock {
    #[serde(rename = "type", deserialize_with = "lenient::named")]
    pub kind: BlockKind,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub caption: Option<String>,
    #[serde(deserialize_with = "lenient::named")]
    pub placement: Placement,
}

/// Kind of a content block
///
/// Serialized as its lowercase name. Any other name deserializes into
/// `Unrecognized` and is skipped by renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Heading,
    Subheading,
    #[default]
    Text,
    Image,
    Unrecognized(String),
}

impl BlockKind {
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Subheading => "subheading",
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Unrecognized(s) => s,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, BlockKind::Unrecognized(_))
    }
}

impl From<String> for BlockKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "heading" => BlockKind::Heading,
            "subheading" => BlockKind::Subheading,
            "text" => BlockKind::Text,
            "image" => BlockKind::Image,
            _ => BlockKind::Unrecognized(s),
        }
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Horizontal placement of a block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Placement {
    #[default]
    Left,
    Center,
    Right,
    Justify,
    /// Laid out as `Left`
    Unrecognized(String),
}

impl Placement {
    pub fn as_str(&self) -> &str {
        match self {
            Placement::Left => "left",
            Placement::Center => "center",
            Placement::Right => "right",
            Placement::Justify => "justify",
            Placement::Unrecognized(s) => s,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Placement::Unrecognized(_))
    }
}

impl From<String> for Placement {
    fn from(s: String) -> Self {
        match s.as_str() {
            "left" => Placement::Left,
            "center" => Placement::Center,
            "right" => Placement::Right,
            "justify" => Placement::Justify,
            _ => Placement::Unrecognized(s),
        }
    }
}

impl From<Placement> for String {
    fn from(placement: Placement) -> Self {
        placement.as_str().to_string()
    }
}

/// A short-form work
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Poetry {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub author: String,
    #[serde(deserialize_with = "lenient::string")]
    pub genre: String,
    #[serde(deserialize_with = "lenient::string")]
    pub publish_date: String,

    /// An empty string is a blank line between stanzas
    #[serde(deserialize_with = "lenient::strings")]
    pub lines: Vec<String>,
}

impl Poetry {
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_publish_date(&self.publish_date)
    }

    pub fn date_label(&self) -> String {
        date_label(&self.publish_date, self.published_on())
    }

    pub fn byline(&self) -> String {
        join_byline(&self.author, &self.genre, &self.date_label())
    }

    /// First `n` lines with the blank ones dropped
    pub fn preview_lines(&self, n: usize) -> Vec<&str> {
        self.lines
            .iter()
            .take(n)
            .map(String::as_str)
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}

fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn date_label(raw: &str, parsed: Option<NaiveDate>) -> String {
    match parsed {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

fn join_byline(author: &str, genre: &str, date: &str) -> String {
    let mut parts = Vec::new();
    if !author.is_empty() {
        parts.push(format!("by {}", author));
    }
    if !genre.is_empty() {
        parts.push(genre.to_string());
    }
    if !date.is_empty() {
        parts.push(date.to_string());
    }
    parts.join(" · ")
}

/// The loaded, immutable content snapshot
#[derive(Debug, Clone, Default)]
pub struct Library {
    document: ConfigDocument,
}

impl Library {
    pub fn new(document: ConfigDocument) -> Self {
        Self { document }
    }

    /// Parses a JSON document without validating it
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json).map(Self::new)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.document.config
    }

    pub fn stories(&self) -> &[Story] {
        &self.document.stories
    }

    pub fn poetries(&self) -> &[Poetry] {
        &self.document.poetries
    }

    pub fn genres(&self) -> &[String] {
        &self.document.config.genres
    }

    /// First story with the given id
    pub fn story(&self, id: &str) -> Option<&Story> {
        self.document.stories.iter().find(|s| s.id == id)
    }

    /// First poem with the given id
    pub fn poem(&self, id: &str) -> Option<&Poetry> {
        self.document.poetries.iter().find(|p| p.id == id)
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Collects non-fatal findings about the document
    ///
    /// Loading never calls this; nothing here prevents a record from being
    /// shown.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        let genres: HashSet<&str> = self.genres().iter().map(String::as_str).collect();

        let mut story_ids = HashSet::new();
        for story in self.stories() {
            if !story_ids.insert(story.id.as_str()) {
                found.push(Diagnostic::DuplicateStoryId(story.id.clone()));
            }
            if !genres.contains(story.genre.as_str()) {
                found.push(Diagnostic::UnlistedGenre {
                    id: story.id.clone(),
                    genre: story.genre.clone(),
                });
            }
            for (page_index, page) in story.pages.iter().enumerate() {
                for block in &page.content {
                    if !block.kind.is_recognized() || !block.placement.is_recognized() {
                        found.push(Diagnostic::UnrecognizedBlock {
                            story: story.id.clone(),
                            page: page_index + 1,
                            kind: block.kind.as_str().to_string(),
                            placement: block.placement.as_str().to_string(),
                        });
                    }
                }
            }
        }

        let mut poem_ids = HashSet::new();
        for poem in self.poetries() {
            if !poem_ids.insert(poem.id.as_str()) {
                found.push(Diagnostic::DuplicatePoemId(poem.id.clone()));
            }
            if !genres.contains(poem.genre.as_str()) {
                found.push(Diagnostic::UnlistedGenre {
                    id: poem.id.clone(),
                    genre: poem.genre.clone(),
                });
            }
        }

        for name in &self.config().themes {
            if name.parse::<Theme>().is_err() {
                found.push(Diagnostic::UnknownTheme(name.clone()));
            }
        }

        found
    }
}

/// A non-fatal finding reported by [`Library::diagnostics`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    DuplicateStoryId(String),
    DuplicatePoemId(String),
    UnlistedGenre { id: String, genre: String },
    UnknownTheme(String),
    UnrecognizedBlock {
        story: String,
        page: usize,
        kind: String,
        placement: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateStoryId(id) => write!(f, "duplicate story id '{}'", id),
            Diagnostic::DuplicatePoemId(id) => write!(f, "duplicate poem id '{}'", id),
            Diagnostic::UnlistedGenre { id, genre } => write!(
                f,
                "'{}' has genre '{}' which is not in the genre list",
                id, genre
            ),
            Diagnostic::UnknownTheme(name) => write!(f, "unknown theme '{}' is ignored", name),
            Diagnostic::UnrecognizedBlock {
                story,
                page,
                kind,
                placement,
            } => write!(
                f,
                "story '{}' page {} has a block of type '{}' placed '{}' that is not rendered as written",
                story, page, kind, placement
            ),
        }
    }
}
