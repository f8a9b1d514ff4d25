//! Runtime configuration.
//!
//! Values are resolved in three layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. a TOML file (`movieshelf.toml` in the working directory, or the path
//!    given on the command line),
//! 3. environment variables.
//!
//! ```toml
//! api_key = "..."
//! storage_path = "data/movies.csv"
//! storage_format = "csv"
//! output_path = "site/index.html"
//! site_title = "Our Movie Nights"
//! ```
//!
//! The only required value is the OMDb API key, usually given through
//! `OMDB_API_KEY`. Unknown keys in the file are rejected to catch typos early.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    clients::omdb_client::OmdbClient,
    error::{AppResult, MovieAppError},
    persisters::storage::StorageFormat,
};

pub const DEFAULT_CONFIG_FILE: &str = "movieshelf.toml";

pub const ENV_API_KEY: &str = "OMDB_API_KEY";
pub const ENV_STORAGE: &str = "MOVIESHELF_STORAGE";
pub const ENV_FORMAT: &str = "MOVIESHELF_FORMAT";
pub const ENV_TEMPLATE: &str = "MOVIESHELF_TEMPLATE";
pub const ENV_OUTPUT: &str = "MOVIESHELF_OUTPUT";

#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub storage_path: PathBuf,
    /// Inferred from the storage path's extension when absent.
    pub storage_format: Option<StorageFormat>,
    /// Built-in template when absent.
    pub template_path: Option<PathBuf>,
    pub output_path: PathBuf,
    pub site_title: String,
    /// Default log filter; `RUST_LOG` still overrides it.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            api_url: OmdbClient::get_base_url(),
            storage_path: PathBuf::from("movies.json"),
            storage_format: None,
            template_path: None,
            output_path: PathBuf::from("index.html"),
            site_title: "My Movie App".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("storage_path", &self.storage_path)
            .field("storage_format", &self.storage_format)
            .field("template_path", &self.template_path)
            .field("output_path", &self.output_path)
            .field("site_title", &self.site_title)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Loads the file at `path` (which must exist), or `movieshelf.toml` when
    /// no path is given (which may be missing), then applies the environment.
    pub fn load(path: Option<&Path>) -> AppResult<Config> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Config::from_file(default_path)?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Config> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MovieAppError::Config(format!("Could not read {}: {}", path.display(), e))
        })?;
        Config::from_toml(&content)
            .map_err(|e| MovieAppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> AppResult<Config> {
        toml::from_str(content).map_err(|e| MovieAppError::Config(e.to_string()))
    }

    /// Applies overrides read through `lookup`, normally the process environment.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(path) = lookup(ENV_STORAGE) {
            self.storage_path = PathBuf::from(path);
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            self.storage_format = Some(format.parse()?);
        }
        if let Some(path) = lookup(ENV_TEMPLATE) {
            self.template_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(ENV_OUTPUT) {
            self.output_path = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(MovieAppError::Config(format!(
                "an OMDb API key is required, set {} or api_key in {}",
                ENV_API_KEY, DEFAULT_CONFIG_FILE
            )));
        }
        if self.api_url.trim().is_empty() {
            return Err(MovieAppError::Config("api_url must not be empty".into()));
        }
        if self.storage_path.as_os_str().is_empty() {
            return Err(MovieAppError::Config("storage_path must not be empty".into()));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(MovieAppError::Config("output_path must not be empty".into()));
        }
        Ok(())
    }

    pub fn storage_format(&self) -> StorageFormat {
        self.storage_format
            .unwrap_or_else(|| StorageFormat::from_path(&self.storage_path))
    }
}
