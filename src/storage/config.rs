//! Configuration handling for the reader
//!
//! Configuration is stored in `~/.config/mythic-chronicles/config.toml`
//! (platform equivalent). Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::source::{ContentLocation, DEFAULT_SOURCE};

/// Environment variable overriding the content location
pub const SOURCE_ENV: &str = "MYTHIC_SOURCE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path or `http(s)` URL of the site document
    pub source: String,

    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Terminal reader refresh interval in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            default_format: OutputFormat::Text,
            tick_rate_ms: 250,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file; a missing file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse config")?;

        config.validate()?;
        Ok(config)
    }

    /// Returns the config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "mythic", "mythic-chronicles")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.source.trim().is_empty() {
            return Err(ConfigError::Invalid("source must not be empty".to_string()));
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid("tick_rate_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Resolves the content location
    ///
    /// Precedence: explicit flag, then `MYTHIC_SOURCE`, then this config.
    pub fn content_location(&self, flag: Option<&str>) -> ContentLocation {
        let env = std::env::var(SOURCE_ENV).ok();
        self.resolve_location(flag, env.as_deref())
    }

    fn resolve_location(&self, flag: Option<&str>, env: Option<&str>) -> ContentLocation {
        let raw = flag
            .or(env)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.source.as_str());

        match raw.parse() {
            Ok(location) => location,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.source, "config.json");
        assert_eq!(config.default_format, OutputFormat::Text);
        assert_eq!(config.tick_rate_ms, 250);
    }

    #[test]
    fn parse_config() {
        let toml = r#"
source = "https://stories.example.com/config.json"
default_format = "json"
"#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.tick_rate_ms, 250);
        assert_eq!(
            config.resolve_location(None, None),
            ContentLocation::Url("https://stories.example.com/config.json".to_string())
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.source, "config.json");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tick_rate_ms = 0\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());

        fs::write(&path, "source = 12\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn location_precedence() {
        let config = AppConfig {
            source: "from-config.json".to_string(),
            ..Default::default()
        };

        assert_eq!(
            config.resolve_location(Some("flag.json"), Some("env.json")),
            ContentLocation::File(PathBuf::from("flag.json"))
        );
        assert_eq!(
            config.resolve_location(None, Some("env.json")),
            ContentLocation::File(PathBuf::from("env.json"))
        );
        assert_eq!(
            config.resolve_location(None, Some("  ")),
            ContentLocation::File(PathBuf::from("from-config.json"))
        );
    }
}
