//! Mythic Chronicles - a reader for stories and poems published as a single
//! JSON site document
//!
//! The document is loaded once, filtered by genre and free-text search, and
//! shown under one of five colour themes whose choice persists between runs.

pub mod cli;
pub mod domain;
pub mod logging;
pub mod storage;

pub use domain::{Library, Poetry, Selection, SelectionState, Story, Theme, ThemeState};
pub use storage::{ContentStore, LoadState};
