use std::path::PathBuf;

use thiserror::Error;

pub type AppResult<T> = Result<T, MovieAppError>;

#[derive(Error, Debug)]
pub enum MovieAppError {
    /// The movie is not part of the collection.
    #[error("Movie '{0}' is not in the collection")]
    NotFound(String),

    /// The metadata service answered, but has no such movie.
    #[error("Movie '{title}' was not found by the metadata service: {reason}")]
    MovieNotFound { title: String, reason: String },

    /// The metadata service could not be reached or answered with an error.
    #[error("Error while talking to the metadata service: {0}")]
    Network(String),

    #[error("Stored collection at {path} is corrupted: {reason}")]
    DataCorruption { path: PathBuf, reason: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MovieAppError {
    pub(crate) fn corrupted(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        MovieAppError::DataCorruption {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
