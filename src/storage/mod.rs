//! # Storage Layer
//!
//! Everything that touches the outside world: the one-shot content load,
//! the preference file, and the user's configuration.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Site document | JSON | `config.json` (path or `http(s)` URL) |
//! | Preferences | JSON object | `<data dir>/mythic-chronicles/preferences.json` |
//! | Config | TOML | `<config dir>/mythic-chronicles/config.toml` |
//!
//! ## Key Types
//!
//! - [`ContentStore`] - Performs the single load and exposes [`LoadState`]
//! - [`FilePreferenceStore`] - Persists the theme across sessions
//! - [`AppConfig`] - User configuration

mod config;
mod preferences;
mod source;

pub use config::{AppConfig, ConfigError, OutputFormat, SOURCE_ENV};
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore};
pub use source::{
    ContentLocation, ContentSource, ContentStore, FileSource, HttpSource, LoadError, LoadState,
    DEFAULT_SOURCE,
};
