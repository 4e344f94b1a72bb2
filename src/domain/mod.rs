//! Domain models for the reader
//!
//! Contains the content model, the view-selection pipeline, and the theme
//! state machine, without any I/O concerns.

mod content;
mod lenient;
mod selection;
mod theme;

pub use content::{
    BlockKind, ConfigDocument, ContentBlock, Diagnostic, HeaderConfig, Library,
    Page, Placement, Poetry, SiteConfig, Story,
};
pub use selection::{
    filter_works, select, ContentTab, Searchable, Selection, SelectionState,
};
pub use theme::{
    ColorToken, Palette, ParseThemeError, PreferenceError, PreferenceStore, Rgb, Theme,
    ThemeState, THEME_KEY,
};
