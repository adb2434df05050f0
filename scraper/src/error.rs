use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApodError>;

#[derive(Debug, Error)]
pub enum ApodError {
    #[error("{0}")]
    Config(String),

    #[error("Fetching '{url}' failed: {status}")]
    Fetch { url: String, status: u16 },

    #[error("Could not find an image for {date}")]
    NotFound { date: NaiveDate },

    #[error("Could not download '{url}': {status}")]
    Download { url: String, status: u16 },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApodError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ApodError::Io {
            path: path.into(),
            source,
        }
    }

    /// Failures that only affect the date being processed. Everything else
    /// (a bad destination, a broken filesystem) stops the run.
    pub fn is_per_date(&self) -> bool {
        matches!(
            self,
            ApodError::Fetch { .. }
                | ApodError::NotFound { .. }
                | ApodError::Download { .. }
                | ApodError::Http(_)
        )
    }
}
