//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use super::output::{Output, OutputFormat};
use super::{library, reader, theme_cmd, tui};
use crate::domain::{Library, Theme, ThemeState};
use crate::storage::{AppConfig, ContentLocation, ContentStore, FilePreferenceStore, LoadState};

#[derive(Parser)]
#[command(name = "mythic")]
#[command(author, version, about = "Read stories and poems from a Mythic Chronicles site document")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Site document path or http(s) URL
    #[arg(long, short = 's', global = true)]
    pub source: Option<String>,

    /// Preferences file (defaults to the platform data directory)
    #[arg(long, global = true, env = "MYTHIC_PREFERENCES")]
    pub preferences: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stories
    Stories {
        /// Only stories of this genre (exact match)
        #[arg(long, short)]
        genre: Option<String>,

        /// Case-insensitive text in title, author or excerpt
        #[arg(long, short = 'q')]
        search: Option<String>,
    },

    /// List poems
    Poems {
        /// Only poems of this genre (exact match)
        #[arg(long, short)]
        genre: Option<String>,

        /// Case-insensitive text in title, author or any line
        #[arg(long, short = 'q')]
        search: Option<String>,
    },

    /// Search stories and poems
    Search {
        /// Search query
        query: String,

        /// Only works of this genre (exact match)
        #[arg(long, short)]
        genre: Option<String>,
    },

    /// Show configured genres
    Genres,

    /// Read a story or poem
    #[command(subcommand)]
    Read(reader::ReadCommands),

    /// Show or change the theme
    #[command(subcommand)]
    Theme(theme_cmd::ThemeCommands),

    /// Report problems in the site document
    Check,

    /// Browse interactively in the terminal
    Browse,
}

/// Resolved settings shared by every command
pub struct Session {
    pub config: AppConfig,
    pub location: ContentLocation,
    preferences: Option<PathBuf>,
}

impl Session {
    pub fn new(config: AppConfig, source: Option<&str>, preferences: Option<PathBuf>) -> Self {
        let location = config.content_location(source);
        Self {
            config,
            location,
            preferences,
        }
    }

    /// A store that has not been loaded yet
    pub fn content_store(&self) -> ContentStore<Box<dyn crate::storage::ContentSource>> {
        ContentStore::new(self.location.source())
    }

    /// Performs the single content load, failing on any load error
    pub fn load_library(&self) -> Result<Library> {
        debug!(location = %self.location, "Loading content");
        let mut store = self.content_store();
        store.load();

        match store.into_state() {
            LoadState::Ready(library) => Ok(library),
            LoadState::Error(message) => Err(anyhow::anyhow!(message)),
            LoadState::Loading => Err(anyhow::anyhow!("Failed to load configuration")),
        }
    }

    pub fn preference_store(&self) -> FilePreferenceStore {
        match &self.preferences {
            Some(path) => FilePreferenceStore::open(path),
            None => FilePreferenceStore::open_default(),
        }
    }

    /// Restores the theme for a deployment that enables `available`
    pub fn theme_state(&self, available: &[Theme]) -> ThemeState<FilePreferenceStore> {
        ThemeState::init(self.preference_store(), available)
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    let config = AppConfig::load()?;
    let output = Output::new(cli.format.unwrap_or(config.default_format));
    let session = Session::new(config, cli.source.as_deref(), cli.preferences);

    debug!("Mythic Chronicles starting");

    match cli.command {
        Commands::Stories { genre, search } => {
            library::stories(&session, &output, genre.as_deref(), search.as_deref())?
        }
        Commands::Poems { genre, search } => {
            library::poems(&session, &output, genre.as_deref(), search.as_deref())?
        }
        Commands::Search { query, genre } => {
            library::search(&session, &output, &query, genre.as_deref())?
        }
        Commands::Genres => library::genres(&session, &output)?,
        Commands::Check => library::check(&session, &output)?,
        Commands::Read(cmd) => reader::run(cmd, &session, &output)?,
        Commands::Theme(cmd) => theme_cmd::run(cmd, &session, &output)?,
        Commands::Browse => tui::run(&session)?,
    }

    debug!("Command completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_filters() {
        let cli = Cli::try_parse_from(["mythic", "stories", "--genre", "Fantasy", "-q", "dragon"])
            .unwrap();
        match cli.command {
            Commands::Stories { genre, search } => {
                assert_eq!(genre.as_deref(), Some("Fantasy"));
                assert_eq!(search.as_deref(), Some("dragon"));
            }
            _ => panic!("Expected stories command"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mythic", "genres", "--format", "json", "--source", "x.json"])
            .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.source.as_deref(), Some("x.json"));
    }

    #[test]
    fn session_load_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let session = Session::new(AppConfig::default(), missing.to_str(), None);

        let err = session.load_library().unwrap_err();
        assert_eq!(err.to_string(), "Failed to load configuration");
    }

    #[test]
    fn session_loads_library() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"stories": [{"id": "1"}]}"#).unwrap();
        let session = Session::new(AppConfig::default(), path.to_str(), None);

        assert_eq!(session.load_library().unwrap().stories().len(), 1);
    }

    #[test]
    fn session_uses_preference_file() {
        let dir = TempDir::new().unwrap();
        let prefs = dir.path().join("prefs.json");
        let session = Session::new(AppConfig::default(), None, Some(prefs.clone()));

        let mut state = session.theme_state(&Theme::ALL);
        state.set_theme(Theme::Galaxy);

        assert_eq!(session.theme_state(&Theme::ALL).current(), Theme::Galaxy);
        assert!(prefs.is_file());
    }
}
