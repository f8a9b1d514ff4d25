use reqwest::{header, Client};

use crate::{
    error::{AppResult, MovieAppError},
    extractors::movie_extractor::MovieExtractor,
    model::movie::MovieRecord,
};

/// Something that can look a movie up by title.
#[allow(async_fn_in_trait)]
pub trait MetadataFetcher {
    async fn fetch(&self, title: &str) -> AppResult<MovieRecord>;
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl std::fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OmdbClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> AppResult<Self> {
        let user_agent = header::HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| MovieAppError::Network(format!("Could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn get_base_url() -> String {
        "http://www.omdbapi.com/".to_string()
    }

    async fn get_json_for_title(&self, title: &str) -> AppResult<String> {
        let resp = self
            .client
            .get(&self.api_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                MovieAppError::Network(format!(
                    "Failed to request movie '{}'. Received error: {}",
                    title,
                    e.without_url()
                ))
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            MovieAppError::Network(format!(
                "Failed to read answer for movie '{}'. Error was {}",
                title,
                e.without_url()
            ))
        })?;

        // OMDb reports some failures (e.g. a bad key) as a JSON body with a 401,
        // so a well-formed error body wins over the bare status.
        if !status.is_success() {
            return match MovieExtractor::extract_movie_from_json(&body, title) {
                Err(e) => Err(e),
                Ok(_) => Err(MovieAppError::Network(format!(
                    "Metadata service answered with status {}",
                    status
                ))),
            };
        }

        Ok(body)
    }
}

impl MetadataFetcher for OmdbClient {
    async fn fetch(&self, title: &str) -> AppResult<MovieRecord> {
        let title = title.trim();
        log::debug!("Fetching information for movie '{}'", title);
        let body = self.get_json_for_title(title).await?;
        let movie = MovieExtractor::extract_movie_from_json(&body, title)?;
        log::debug!("Successfully fetched information for movie '{}'", movie.title);
        Ok(movie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_api_key() {
        let client = OmdbClient::new(OmdbClient::get_base_url(), "secret-key").unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("www.omdbapi.com"));
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client = OmdbClient::new("http://127.0.0.1:9/", "key").unwrap();
        let result = client.fetch("Inception").await;
        assert!(matches!(result, Err(MovieAppError::Network(_))));
    }
}
