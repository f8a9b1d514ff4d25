use serde::Deserialize;

use crate::{
    error::{AppResult, MovieAppError},
    model::movie::MovieRecord,
};

/// OMDb marks every missing value with this literal.
const NOT_AVAILABLE: &str = "N/A";

/// The subset of an OMDb answer we care about. Every field is optional: the
/// service omits or blanks fields freely.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

#[derive(Debug)]
pub struct MovieExtractor {}

impl MovieExtractor {
    pub fn extract_movie_from_json(body: &str, requested_title: &str) -> AppResult<MovieRecord> {
        let response: OmdbResponse = serde_json::from_str(body).map_err(|e| {
            MovieAppError::Network(format!(
                "Unexpected answer for movie '{}': {}",
                requested_title, e
            ))
        })?;

        if response
            .response
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("false"))
        {
            let reason = response
                .error
                .unwrap_or_else(|| "no error message given".to_string());
            if reason.to_lowercase().contains("not found") {
                return Err(MovieAppError::MovieNotFound {
                    title: requested_title.to_string(),
                    reason,
                });
            }
            return Err(MovieAppError::Network(reason));
        }

        let title = available(response.title).unwrap_or_else(|| requested_title.trim().to_string());
        if title.is_empty() {
            return Err(MovieAppError::Validation(
                "Movie title must not be empty".to_string(),
            ));
        }

        Ok(MovieRecord {
            title,
            year: available(response.year)
                .and_then(|y| Self::extract_year(&y))
                .unwrap_or(0),
            rating: available(response.imdb_rating)
                .and_then(|r| r.parse::<f32>().ok())
                .filter(|r| (0.0..=10.0).contains(r))
                .unwrap_or(0.0),
            poster_url: available(response.poster).unwrap_or_default(),
            imdb_id: available(response.imdb_id).unwrap_or_default(),
            note: None,
        })
    }

    /// Series report ranges like "2008–2013"; the leading year is kept.
    fn extract_year(year: &str) -> Option<u32> {
        let digits: String = year
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse::<u32>().ok()
    }
}

fn available(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}
