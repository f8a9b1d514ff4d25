use std::{fmt, path::Path, str::FromStr};

use serde::Deserialize;

use crate::{
    error::{AppResult, MovieAppError},
    model::collection::Collection,
    persisters::{csv_storage::CsvStorage, json_storage::JsonStorage},
};

/// Where the collection lives between runs.
///
/// `load` must treat a missing or empty backing store as an empty collection,
/// and `save` always overwrites the whole store.
pub trait Storage {
    fn load(&self) -> AppResult<Collection>;
    fn save(&self, collection: &Collection) -> AppResult<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self) -> AppResult<Collection> {
        (**self).load()
    }

    fn save(&self, collection: &Collection) -> AppResult<()> {
        (**self).save(collection)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    Json,
    Csv,
}

impl StorageFormat {
    pub fn from_path(path: &Path) -> StorageFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => StorageFormat::Csv,
            _ => StorageFormat::Json,
        }
    }
}

impl FromStr for StorageFormat {
    type Err = MovieAppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StorageFormat::Json),
            "csv" => Ok(StorageFormat::Csv),
            other => Err(MovieAppError::Config(format!(
                "unknown storage format '{}', expected 'json' or 'csv'",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageFormat::Json => write!(f, "json"),
            StorageFormat::Csv => write!(f, "csv"),
        }
    }
}

pub fn open_storage(path: &Path, format: StorageFormat) -> Box<dyn Storage> {
    log::debug!("Using {} storage at {}", format, path.display());
    match format {
        StorageFormat::Json => Box::new(JsonStorage::new(path)),
        StorageFormat::Csv => Box::new(CsvStorage::new(path)),
    }
}

/// Reads the backing file, mapping "does not exist" and "only whitespace" to `None`.
pub(crate) fn read_backing_file(path: &Path) -> AppResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No collection at {} yet, starting empty", path.display());
            Ok(None)
        }
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            Err(MovieAppError::corrupted(path, e))
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
