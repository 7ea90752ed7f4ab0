use std::path::PathBuf;

use serde::Serialize;

/// One book as listed on a search results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub author: Option<String>,
    /// Release date or download count, depending on the requested sort order.
    pub extra: Option<String>,
    /// Site-relative path of the book's detail page, e.g. `/ebooks/84`.
    pub link: String,
    /// Site-relative path of the cover thumbnail.
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookshelf {
    pub title: String,
    pub link: Option<String>,
}

/// Files written by a single book download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedBook {
    pub book_id: String,
    pub pdf: PathBuf,
    pub metadata: Option<PathBuf>,
}
