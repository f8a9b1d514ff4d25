use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};

use crate::{
    error::{AppResult, MovieAppError},
    model::{collection::Collection, movie::MovieRecord},
    persisters::storage::{ensure_parent_dir, read_backing_file, Storage},
};

/// Stores the collection as a CSV table, one movie per row.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvStorage {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column order matches the field order of `MovieRecord`.
    pub fn csv_titles() -> Vec<&'static str> {
        vec!["title", "year", "rating", "poster_url", "imdb_id", "note"]
    }

    fn decode(&self, content: &str) -> AppResult<Collection> {
        let mut reader = ReaderBuilder::new().from_reader(content.as_bytes());
        let mut collection = Collection::new();
        for (line, row) in reader.deserialize::<MovieRecord>().enumerate() {
            let movie = row.map_err(|e| MovieAppError::corrupted(&self.path, e))?;
            if movie.title.trim().is_empty() {
                return Err(MovieAppError::corrupted(
                    &self.path,
                    format!("row {} has an empty title", line + 1),
                ));
            }
            if collection.contains(&movie.title) {
                return Err(MovieAppError::corrupted(
                    &self.path,
                    format!("duplicate title '{}'", movie.title),
                ));
            }
            collection.upsert(movie);
        }
        Ok(collection)
    }
}

impl Storage for CsvStorage {
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
        ensure_parent_dir(&self.path)?;
        let file_name = self.path.display();
        let mut wrt = WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|e| csv_write_error(e, "creating", &file_name))?;

        wrt.write_record(Self::csv_titles())
            .map_err(|e| csv_write_error(e, "adding header to", &file_name))?;
        for movie in collection {
            wrt.serialize(movie)
                .map_err(|e| csv_write_error(e, "adding entry to", &file_name))?;
        }
        wrt.flush()?;

        log::debug!("Saved {} movies to {}", collection.len(), file_name);
        Ok(())
    }
}

fn csv_write_error(e: csv::Error, action: &str, file_name: &impl std::fmt::Display) -> MovieAppError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => MovieAppError::Io(io),
        other => MovieAppError::Validation(format!(
            "Error when {} CSV file {}: {:?}",
            action, file_name, other
        )),
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
        inception.note = Some("Dreams, within dreams, \"within\" dreams".to_string());

        vec![inception, MovieRecord::new("Alien", 1979, 8.5)]
            .into_iter()
            .collect()
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let storage = CsvStorage::new(tmp.path().join("movies.csv"));
        let collection = sample_collection();

        storage.save(&collection).unwrap();

        assert_eq!(storage.load().unwrap(), collection);
    }

    #[test]
    fn writes_header_and_one_row_per_movie() {
        let tmp = TempDir::new().unwrap();
        let storage = CsvStorage::new(tmp.path().join("movies.csv"));
        storage.save(&sample_collection()).unwrap();

        let content = fs::read_to_string(storage.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "title,year,rating,poster_url,imdb_id,note");
        assert_eq!(lines[2], "Alien,1979,8.5,,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_collection_still_writes_header() {
        let tmp = TempDir::new().unwrap();
        let storage = CsvStorage::new(tmp.path().join("movies.csv"));
        storage.save(&Collection::new()).unwrap();

        let content = fs::read_to_string(storage.path()).unwrap();
        assert_eq!(content.trim(), "title,year,rating,poster_url,imdb_id,note");
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = CsvStorage::new(tmp.path().join("movies.csv"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_row_is_data_corruption() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("movies.csv");
        fs::write(
            &path,
            "title,year,rating,poster_url,imdb_id,note\nAlien,not-a-year,8.5,,,\n",
        )
        .unwrap();

        let result = CsvStorage::new(&path).load();
        assert!(matches!(result, Err(MovieAppError::DataCorruption { .. })));
    }

    #[test]
    fn titles_differing_only_by_case_are_data_corruption() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("movies.csv");
        fs::write(
            &path,
            "title,year,rating,poster_url,imdb_id,note\nAlien,1979,8.5,,,\nALIEN ,2099,1.0,,,\n",
        )
        .unwrap();

        let result = CsvStorage::new(&path).load();
        assert!(matches!(result, Err(MovieAppError::DataCorruption { .. })));
    }
}
