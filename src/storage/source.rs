//! Content loading
//!
//! The site document is read exactly once per run from a file or an
//! `http(s)` URL. There is no retry, no timeout and no cache: a failed load
//! is final for the session.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::Library;

/// Resource fetched when nothing else is configured
pub const DEFAULT_SOURCE: &str = "config.json";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// Transport failure, missing file or non-success status
    #[error("Failed to load configuration")]
    Unavailable,

    #[error("Failed to parse configuration: {0}")]
    Malformed(String),
}

/// Where the site document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    File(PathBuf),
    Url(String),
}

impl ContentLocation {
    /// Builds the matching source
    pub fn source(&self) -> Box<dyn ContentSource> {
        match self {
            ContentLocation::File(path) => Box::new(FileSource::new(path.clone())),
            ContentLocation::Url(url) => Box::new(HttpSource::new(url.clone())),
        }
    }
}

impl Default for ContentLocation {
    fn default() -> Self {
        ContentLocation::File(PathBuf::from(DEFAULT_SOURCE))
    }
}

impl FromStr for ContentLocation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(ContentLocation::Url(s.to_string()))
        } else {
            Ok(ContentLocation::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for ContentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentLocation::File(path) => write!(f, "{}", path.display()),
            ContentLocation::Url(url) => f.write_str(url),
        }
    }
}

/// A one-shot reader of the raw site document
pub trait ContentSource {
    fn fetch(&self) -> Result<String, LoadError>;
}

/// Reads the document from the local filesystem
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for FileSource {
    fn fetch(&self) -> Result<String, LoadError> {
        debug!(path = %self.path.display(), "Reading content document");
        fs::read_to_string(&self.path).map_err(|e| {
            warn!("Could not read {}: {}", self.path.display(), e);
            LoadError::Unavailable
        })
    }
}

/// Fetches the document with a single blocking GET
pub struct HttpSource {
    url: String,
    use_proxy: bool,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            use_proxy: true,
        }
    }

    /// Ignores proxy settings from the environment
    pub fn without_proxy(mut self) -> Self {
        self.use_proxy = false;
        self
    }
}

impl ContentSource for HttpSource {
    fn fetch(&self) -> Result<String, LoadError> {
        debug!(url = %self.url, "Fetching content document");

        let mut builder = reqwest::blocking::Client::builder().timeout(None::<Duration>);
        if !self.use_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| {
                warn!("Could not build HTTP client: {}", e);
                LoadError::Unavailable
            })?;

        let response = client.get(&self.url).send().map_err(|e| {
            warn!("Request to {} failed: {}", self.url, e);
            LoadError::Unavailable
        })?;

        if !response.status().is_success() {
            warn!("{} answered {}", self.url, response.status());
            return Err(LoadError::Unavailable);
        }

        response.text().map_err(|e| {
            warn!("Could not read body from {}: {}", self.url, e);
            LoadError::Unavailable
        })
    }
}

/// Observable state of the content store
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Error(String),
    Ready(Library),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn library(&self) -> Option<&Library> {
        match self {
            LoadState::Ready(library) => Some(library),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Holds the single load attempt and its outcome
pub struct ContentStore<S: ContentSource> {
    source: S,
    state: LoadState,
}

impl<S: ContentSource> ContentStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Performs the load; once settled, further calls do not fetch again
    pub fn load(&mut self) -> &LoadState {
        if !self.state.is_loading() {
            return &self.state;
        }

        self.state = match self.fetch_library() {
            Ok(library) => {
                info!(
                    stories = library.stories().len(),
                    poetries = library.poetries().len(),
                    "Content loaded"
                );
                LoadState::Ready(library)
            }
            Err(e) => {
                warn!("Content load failed: {}", e);
                LoadState::Error(e.to_string())
            }
        };

        &self.state
    }

    /// Consumes the store, returning its settled state
    pub fn into_state(self) -> LoadState {
        self.state
    }

    fn fetch_library(&self) -> Result<Library, LoadError> {
        let raw = self.source.fetch()?;
        Library::from_json(&raw).map_err(|e| LoadError::Malformed(e.to_string()))
    }
}

impl<S: ContentSource + ?Sized> ContentSource for Box<S> {
    fn fetch(&self) -> Result<String, LoadError> {
        (**self).fetch()
    }
}
