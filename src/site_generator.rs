//! Static HTML page for the collection.
//!
//! A template is a complete HTML document with two markers:
//! `__TEMPLATE_TITLE__` (replaced by the site title, may appear any number of
//! times) and `__TEMPLATE_MOVIE_GRID__` (replaced by one `<li>` per movie, must
//! be present). Everything else in the template is copied through untouched.
//! Fragments are built with maud, so titles and notes are HTML-escaped.

use std::path::{Path, PathBuf};

use maud::{html, Markup};

use crate::{
    config::Config,
    error::{AppResult, MovieAppError},
    model::{collection::Collection, movie::MovieRecord},
    persisters::storage::ensure_parent_dir,
};

pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/128x193?text=No+Poster";

pub const DEFAULT_TEMPLATE: &str = include_str!("../static/index_template.html");

/// Renders one movie as a grid item.
pub fn render_movie_item(movie: &MovieRecord) -> Markup {
    let poster_src = if movie.poster_url.trim().is_empty() {
        PLACEHOLDER_POSTER
    } else {
        movie.poster_url.as_str()
    };
    let poster = html! {
        img.movie-poster src=(poster_src) alt=(format!("Poster of {}", movie.title)) title=[movie.note.as_deref()];
    };
    let item_id = (!movie.imdb_id.is_empty()).then(|| format!("movie-{}", movie.imdb_id));

    html! {
        li id=[item_id] {
            @if let Some(url) = movie.imdb_url() {
                a href=(url) target="_blank" { (poster) }
            } @else {
                (poster)
            }
            div.movie-title { (movie.title) }
            div.movie-year {
                @if movie.year > 0 { (movie.year) } @else { "Year unknown" }
            }
            div.movie-rating { "Rating: " (format!("{:.1}", movie.rating)) " \u{2729}" }
            @if let Some(note) = &movie.note {
                p.movie-note { (note) }
            }
        }
    }
}

/// Substitutes the rendered movies, in order, into `template`.
pub fn render<'a>(
    movies: impl IntoIterator<Item = &'a MovieRecord>,
    template: &str,
    site_title: &str,
) -> AppResult<String> {
    if !template.contains(GRID_PLACEHOLDER) {
        return Err(MovieAppError::Validation(format!(
            "Template has no {} placeholder",
            GRID_PLACEHOLDER
        )));
    }

    let grid: String = movies
        .into_iter()
        .map(|movie| render_movie_item(movie).into_string())
        .collect::<Vec<_>>()
        .join("\n");
    let escaped_title = html! { (site_title) }.into_string();

    // Title substitution runs on the template text only, never on the inserted
    // grid or title.
    let (head, tail) = template
        .split_once(GRID_PLACEHOLDER)
        .unwrap_or((template, ""));
    Ok(format!(
        "{}{}{}",
        head.replace(TITLE_PLACEHOLDER, &escaped_title),
        grid,
        tail.replace(TITLE_PLACEHOLDER, &escaped_title)
    ))
}

#[derive(Debug, Clone)]
pub struct SiteGenerator {
    template: String,
    output_path: PathBuf,
    site_title: String,
}

impl SiteGenerator {
    pub fn new(output_path: impl AsRef<Path>, site_title: impl Into<String>) -> Self {
        SiteGenerator {
            template: DEFAULT_TEMPLATE.to_string(),
            output_path: output_path.as_ref().to_path_buf(),
            site_title: site_title.into(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Uses the configured template file when there is one, the built-in
    /// template otherwise.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let generator = SiteGenerator::new(&config.output_path, config.site_title.clone());
        match &config.template_path {
            Some(path) => {
                let template = std::fs::read_to_string(path).map_err(|e| {
                    MovieAppError::Config(format!(
                        "Could not read template {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(generator.with_template(template))
            }
            None => Ok(generator),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn render(&self, collection: &Collection) -> AppResult<String> {
        render(collection, &self.template, &self.site_title)
    }

    /// Renders the collection and writes the page, returning where it went.
    pub fn generate(&self, collection: &Collection) -> AppResult<PathBuf> {
        let page = self.render(collection)?;
        ensure_parent_dir(&self.output_path)?;
        std::fs::write(&self.output_path, page)?;
        log::info!(
            "Generated website with {} movies at {}",
            collection.len(),
            self.output_path.display()
        );
        Ok(self.output_path.clone())
    }
}
