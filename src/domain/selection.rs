//! View-selection pipeline
//!
//! Turns the loaded collections plus the home view's filter state into the
//! lists that are actually shown. Everything here is pure: the same inputs
//! always give the same output and source order is preserved.

use serde::Serialize;

use super::content::{Library, Poetry, Story};

/// A record that the genre and search filters can test
pub trait Searchable {
    fn genre(&self) -> &str;

    /// True if `folded_query` (already lowercased) occurs in a searchable field
    fn matches(&self, folded_query: &str) -> bool;
}

impl Searchable for Story {
    fn genre(&self) -> &str {
        &self.genre
    }

    fn matches(&self, folded_query: &str) -> bool {
        contains_folded(&self.title, folded_query)
            || contains_folded(&self.author, folded_query)
            || contains_folded(&self.excerpt, folded_query)
    }
}

impl Searchable for Poetry {
    fn genre(&self) -> &str {
        &self.genre
    }

    fn matches(&self, folded_query: &str) -> bool {
        contains_folded(&self.title, folded_query)
            || contains_folded(&self.author, folded_query)
            || self.lines.iter().any(|line| contains_folded(line, folded_query))
    }
}

fn contains_folded(field: &str, folded_query: &str) -> bool {
    field.to_lowercase().contains(folded_query)
}

/// Applies the genre and search filters to one collection
///
/// Genre is an exact, case-sensitive match. An empty query excludes nothing.
pub fn filter_works<'a, T: Searchable>(
    items: &'a [T],
    selected_genre: Option<&str>,
    search_query: &str,
) -> Vec<&'a T> {
    let folded = search_query.to_lowercase();

    items
        .iter()
        .filter(|item| selected_genre.map_or(true, |genre| item.genre() == genre))
        .filter(|item| search_query.is_empty() || item.matches(&folded))
        .collect()
}

/// Filtered stories and poems
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection<'a> {
    pub stories: Vec<&'a Story>,
    pub poetries: Vec<&'a Poetry>,
}

/// Filters both collections with the same genre and query
pub fn select<'a>(
    stories: &'a [Story],
    poetries: &'a [Poetry],
    selected_genre: Option<&str>,
    search_query: &str,
) -> Selection<'a> {
    Selection {
        stories: filter_works(stories, selected_genre, search_query),
        poetries: filter_works(poetries, selected_genre, search_query),
    }
}

/// Which collection the home view lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTab {
    #[default]
    Stories,
    Poetries,
}

impl ContentTab {
    pub fn toggle(self) -> Self {
        match self {
            ContentTab::Stories => ContentTab::Poetries,
            ContentTab::Poetries => ContentTab::Stories,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentTab::Stories => "stories",
            ContentTab::Poetries => "poetries",
        }
    }
}

/// Transient filter state of the home view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub search_query: String,
    pub selected_genre: Option<String>,
    pub active_tab: ContentTab,
}

impl SelectionState {
    /// Runs the pipeline against `library`; recomputed on every call
    pub fn apply<'a>(&self, library: &'a Library) -> Selection<'a> {
        select(
            library.stories(),
            library.poetries(),
            self.selected_genre.as_deref(),
            &self.search_query,
        )
    }

    /// Clears the genre filter; the search query is left alone
    pub fn clear_filters(&mut self) {
        self.selected_genre = None;
    }

    /// Advances the genre filter through `genres`, then back to "all"
    pub fn cycle_genre(&mut self, genres: &[String]) {
        self.selected_genre = match &self.selected_genre {
            None => genres.first().cloned(),
            Some(current) => match genres.iter().position(|g| g == current) {
                Some(idx) => genres.get(idx + 1).cloned(),
                None => genres.first().cloned(),
            },
        };
    }

    /// Steps the genre filter backwards, the reverse of [`Self::cycle_genre`]
    pub fn cycle_genre_back(&mut self, genres: &[String]) {
        self.selected_genre = match &self.selected_genre {
            None => genres.last().cloned(),
            Some(current) => match genres.iter().position(|g| g == current) {
                Some(0) | None => None,
                Some(idx) => genres.get(idx - 1).cloned(),
            },
        };
    }
}
