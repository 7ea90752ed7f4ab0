//! Error types for catalog operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Rejected caller input. Always raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("the search query cannot be blank")]
    EmptyQuery,

    #[error("the search query must be at least 3 characters long, got {query:?}")]
    QueryTooShort { query: String },

    #[error("unknown sort order {0:?}; expected one of 'title', 'release_date', 'downloads'")]
    UnknownSortOrder(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Page is missing structure the extractor depends on.
    #[error("page is missing expected markup: {0}")]
    MissingMarkup(&'static str),

    /// Bibliographic table has fewer value cells than label cells.
    #[error("bibliographic table has {labels} labels but only {values} values")]
    MalformedTable { labels: usize, values: usize },

    #[error("cannot derive a book id from link {0:?}")]
    InvalidLink(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status carried by the error, if it came from a page fetch.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
