use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{AppResult, MovieAppError},
    model::{collection::Collection, movie::MovieRecord},
    persisters::storage::{ensure_parent_dir, read_backing_file, Storage},
};

/// Stores the collection as one JSON object keyed by movie title:
///
/// ```json
/// {
///   "Inception": { "year": 2010, "rating": 8.8, "poster_url": "...", "imdb_id": "tt1375666" }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

/// A record without its title, which is the key of the enclosing object.
#[derive(Debug, Serialize, Deserialize)]
struct StoredMovie {
    #[serde(default)]
    year: u32,
    #[serde(default)]
    rating: f32,
    #[serde(default)]
    poster_url: String,
    #[serde(default)]
    imdb_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl JsonStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonStorage {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self, content: &str) -> AppResult<Collection> {
        let entries: Map<String, Value> = serde_json::from_str(content)
            .map_err(|e| MovieAppError::corrupted(&self.path, e))?;

        let mut collection = Collection::new();
        for (title, value) in entries {
            if title.trim().is_empty() {
                return Err(MovieAppError::corrupted(&self.path, "entry with an empty title"));
            }
            if collection.contains(&title) {
                return Err(MovieAppError::corrupted(
                    &self.path,
                    format!("duplicate title '{}'", title),
                ));
            }
            let stored: StoredMovie = serde_json::from_value(value).map_err(|e| {
                MovieAppError::corrupted(&self.path, format!("entry '{}': {}", title, e))
            })?;
            collection.upsert(MovieRecord {
                title,
                year: stored.year,
                rating: stored.rating,
                poster_url: stored.poster_url,
                imdb_id: stored.imdb_id,
                note: stored.note,
            });
        }
        Ok(collection)
    }

    fn encode(collection: &Collection) -> AppResult<String> {
        let mut entries = Map::new();
        for movie in collection {
            let stored = StoredMovie {
                year: movie.year,
                rating: movie.rating,
                poster_url: movie.poster_url.clone(),
                imdb_id: movie.imdb_id.clone(),
                note: movie.note.clone(),
            };
            let value = serde_json::to_value(stored)
                .map_err(|e| MovieAppError::Validation(format!("{}: {}", movie.title, e)))?;
            entries.insert(movie.title.clone(), value);
        }
        serde_json::to_string_pretty(&entries)
            .map_err(|e| MovieAppError::Validation(e.to_string()))
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> AppResult<Collection> {
        match read_backing_file(&self.path)? {
            Some(content) => {
                let collection = self.decode(&content)?;
                log::debug!(
                    "Loaded {} movies from {}",
                    collection.len(),
                    self.path.display()
                );
                Ok(collection)
            }
            None => Ok(Collection::new()),
        }
    }

    fn save(&self, collection: &Collection) -> AppResult<()> {
        let json = Self::encode(collection)?;
        ensure_parent_dir(&self.path)?;
        std::fs::write(&self.path, json)?;
        log::debug!("Saved {} movies to {}", collection.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_collection() -> Collection {
        let mut inception = MovieRecord::new("Inception", 2010, 8.8);
        inception.poster_url = "https://example.com/inception.jpg".to_string();
        inception.imdb_id = "tt1375666".to_string();
        inception.note = Some("Watch again".to_string());

        vec![MovieRecord::new("Zodiac", 2007, 7.7), inception]
            .into_iter()
            .collect()
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonStorage::new(tmp.path().join("movies.json"));
        let collection = sample_collection();

        storage.save(&collection).unwrap();

        assert_eq!(storage.load().unwrap(), collection);
    }

    #[test]
    fn file_is_an_object_keyed_by_title_in_insertion_order() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonStorage::new(tmp.path().join("movies.json"));
        storage.save(&sample_collection()).unwrap();

        let content = fs::read_to_string(storage.path()).unwrap();
        let zodiac = content.find("\"Zodiac\"").unwrap();
        let inception = content.find("\"Inception\"").unwrap();
        assert!(zodiac < inception);

        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["Inception"]["year"], 2010);
        assert_eq!(value["Inception"]["note"], "Watch again");
        assert!(value["Zodiac"].get("note").is_none());
    }

    #[test]
    fn missing_and_empty_files_load_as_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("movies.json");
        let storage = JsonStorage::new(&path);

        assert!(storage.load().unwrap().is_empty());

        fs::write(&path, "  \n").unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_file_is_data_corruption() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("movies.json");
        fs::write(&path, "{ this is not json").unwrap();

        let result = JsonStorage::new(&path).load();
        assert!(matches!(result, Err(MovieAppError::DataCorruption { .. })));
    }

    #[test]
    fn wrongly_typed_entry_is_data_corruption() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("movies.json");
        fs::write(&path, r#"{"Inception": {"year": "twenty ten"}}"#).unwrap();

        let result = JsonStorage::new(&path).load();
        assert!(matches!(result, Err(MovieAppError::DataCorruption { .. })));
    }

    #[test]
    fn titles_differing_only_by_case_are_data_corruption() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("movies.json");
        fs::write(
            &path,
            r#"{"Alien": {"year": 1979, "rating": 8.5}, "alien": {"year": 2099, "rating": 1.0}}"#,
        )
        .unwrap();

        let result = JsonStorage::new(&path).load();
        assert!(matches!(result, Err(MovieAppError::DataCorruption { .. })));
    }

    #[test]
    fn missing_fields_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("movies.json");
        fs::write(&path, r#"{"Inception": {"rating": 8.8, "year": 2010}}"#).unwrap();

        let collection = JsonStorage::new(&path).load().unwrap();
        let movie = collection.get("Inception").unwrap();
        assert_eq!(movie.poster_url, "");
        assert_eq!(movie.imdb_id, "");
        assert_eq!(movie.note, None);
    }

    #[test]
    fn save_overwrites_and_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonStorage::new(tmp.path().join("data/nested/movies.json"));

        storage.save(&sample_collection()).unwrap();
        storage.save(&Collection::new()).unwrap();

        assert!(storage.load().unwrap().is_empty());
    }
}
