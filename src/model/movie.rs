use serde::{Deserialize, Serialize};

/// One movie of the collection, as fetched from the metadata service plus the
/// user's own note.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub imdb_id: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>, year: u32, rating: f32) -> Self {
        MovieRecord {
            title: title.into(),
            year,
            rating,
            ..Default::default()
        }
    }

    pub fn imdb_url(&self) -> Option<String> {
        if self.imdb_id.is_empty() {
            return None;
        }
        Some(format!("https://www.imdb.com/title/{}", self.imdb_id))
    }

    pub fn has_title(&self, title: &str) -> bool {
        normalize_title(&self.title) == normalize_title(title)
    }
}

/// Key used to compare titles: surrounding whitespace is ignored, and so is case.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_match_ignoring_case_and_whitespace() {
        let movie = MovieRecord::new("Inception", 2010, 8.8);
        assert!(movie.has_title("  inception "));
        assert!(movie.has_title("INCEPTION"));
        assert!(!movie.has_title("Inception 2"));
    }

    #[test]
    fn imdb_url_requires_an_id() {
        let mut movie = MovieRecord::new("Inception", 2010, 8.8);
        assert_eq!(movie.imdb_url(), None);

        movie.imdb_id = "tt1375666".to_string();
        assert_eq!(
            movie.imdb_url().as_deref(),
            Some("https://www.imdb.com/title/tt1375666")
        );
    }
}
