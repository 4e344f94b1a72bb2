//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Library | Filtered listings | `stories`, `poems`, `search`, `genres` |
//! | Reading | Full text of one work | `read story`, `read poem` |
//! | Theme | Persisted colour theme | `theme show`, `theme set`, `theme list` |
//! | Diagnostics | Document sanity checks | `check` |
//! | Interactive | Terminal reader | `browse` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in `config.toml`.
//!
//! ## Content Source
//!
//! `--source` takes a file path or an http(s) URL. Without it the
//! `MYTHIC_SOURCE` variable, then `source` in `config.toml`, then
//! `config.json` in the working directory are used.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod library;
mod output;
mod reader;
mod theme_cmd;
mod tui;

pub use app::{run, Cli, Commands, Session};
pub use output::{Output, OutputFormat};
