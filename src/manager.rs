use crate::{
    clients::omdb_client::MetadataFetcher,
    error::{AppResult, MovieAppError},
    model::{
        collection::Collection,
        movie::{normalize_title, MovieRecord},
    },
    persisters::storage::Storage,
};

/// Notes longer than this are cut.
pub const MAX_NOTE_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionStats {
    pub count: usize,
    /// `None` for an empty collection.
    pub average_rating: Option<f32>,
    pub median_rating: Option<f32>,
    /// Every title sharing the highest rating.
    pub best: Vec<String>,
    /// Every title sharing the lowest rating.
    pub worst: Vec<String>,
}

/// Runs the user's commands against a collection kept in `storage`.
///
/// Each operation loads the current collection, works on it in memory and
/// saves it back when it changed. Nothing is cached between calls, so the
/// backing store stays the source of truth.
pub struct CollectionManager<S, F> {
    storage: S,
    fetcher: F,
}

impl<S: Storage, F: MetadataFetcher> CollectionManager<S, F> {
    pub fn new(storage: S, fetcher: F) -> Self {
        CollectionManager { storage, fetcher }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Fetches `title` and stores it, replacing any movie already known under
    /// the same title. The user's note of a replaced movie is kept.
    pub async fn add(&self, title: &str) -> AppResult<MovieRecord> {
        let title = require_title(title)?;
        let mut collection = self.storage.load()?;

        let mut movie = self.fetcher.fetch(title).await?;
        let existing = collection
            .get(&movie.title)
            .or_else(|| collection.get(title))
            .map(|m| (m.title.clone(), m.note.clone()));

        match existing {
            Some((existing_title, existing_note)) => {
                if movie.note.is_none() {
                    movie.note = existing_note;
                }
                collection.replace(&existing_title, movie.clone());
                log::info!("Replacing '{}' with a freshly fetched copy", existing_title);
            }
            None => {
                collection.upsert(movie.clone());
            }
        }
        self.storage.save(&collection)?;
        log::info!("Added movie '{}' ({})", movie.title, movie.year);
        Ok(movie)
    }

    /// Sets the note of a stored movie. An empty note clears it.
    pub fn update(&self, title: &str, note: &str) -> AppResult<MovieRecord> {
        let title = require_title(title)?;
        let mut collection = self.storage.load()?;

        let movie = collection
            .get_mut(title)
            .ok_or_else(|| MovieAppError::NotFound(title.to_string()))?;
        movie.note = clean_note(note);
        let updated = movie.clone();

        self.storage.save(&collection)?;
        log::info!("Updated note for movie '{}'", updated.title);
        Ok(updated)
    }

    pub fn delete(&self, title: &str) -> AppResult<MovieRecord> {
        let title = require_title(title)?;
        let mut collection = self.storage.load()?;

        let removed = collection
            .remove(title)
            .ok_or_else(|| MovieAppError::NotFound(title.to_string()))?;

        self.storage.save(&collection)?;
        log::info!("Deleted movie '{}'", removed.title);
        Ok(removed)
    }

    pub fn list(&self) -> AppResult<Collection> {
        self.storage.load()
    }

    /// Case-insensitive substring search on titles. A blank query matches nothing.
    pub fn search(&self, query: &str) -> AppResult<Vec<MovieRecord>> {
        let query = normalize_title(query);
        if query.is_empty() {
            return Ok(vec![]);
        }

        Ok(self
            .storage
            .load()?
            .into_iter()
            .filter(|movie| normalize_title(&movie.title).contains(&query))
            .collect())
    }

    pub fn stats(&self) -> AppResult<CollectionStats> {
        Ok(compute_stats(&self.storage.load()?))
    }
}

pub fn compute_stats(collection: &Collection) -> CollectionStats {
    if collection.is_empty() {
        return CollectionStats::default();
    }

    let mut ratings: Vec<f32> = collection.iter().map(|m| m.rating).collect();
    ratings.sort_by(|a, b| a.total_cmp(b));

    let count = ratings.len();
    let average = ratings.iter().sum::<f32>() / count as f32;
    let median = if count % 2 == 0 {
        (ratings[count / 2 - 1] + ratings[count / 2]) / 2.0
    } else {
        ratings[count / 2]
    };

    let lowest = ratings[0];
    let highest = ratings[count - 1];
    let titles_rated = |rating: f32| -> Vec<String> {
        collection
            .iter()
            .filter(|m| m.rating == rating)
            .map(|m| m.title.clone())
            .collect()
    };

    CollectionStats {
        count,
        average_rating: Some(average),
        median_rating: Some(median),
        best: titles_rated(highest),
        worst: titles_rated(lowest),
    }
}

fn require_title(title: &str) -> AppResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(MovieAppError::Validation(
            "Movie title must not be empty".to_string(),
        ));
    }
    Ok(title)
}

fn clean_note(note: &str) -> Option<String> {
    let note: String = note.trim().chars().take(MAX_NOTE_LEN).collect();
    let note = note.trim_end().to_string();
    if note.is_empty() {
        None
    } else {
        Some(note)
    }
}
