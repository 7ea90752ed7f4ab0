//! # gutenberg2pdf
//!
//! A client for the [Project Gutenberg](https://www.gutenberg.org) catalog:
//! search books, list bookshelves, read bibliographic metadata and save
//! books as PDF files.
//!
//! ## Usage
//!
//! ```no_run
//! use gutenberg2pdf::{ClientConfig, Gutenberg, SearchOptions, SearchQuery};
//!
//! # async fn run() -> gutenberg2pdf::Result<()> {
//! let client = Gutenberg::new(ClientConfig::default())?;
//! let query = SearchQuery::new("frankenstein")?;
//! for book in client.quick_search(&query, SearchOptions::default()).await? {
//!     println!("{} ({})", book.title, book.link);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod extract;
mod metadata;
mod models;
mod query;
mod renderer;

pub use client::Gutenberg;
pub use config::{ClientConfig, Endpoints, DEFAULT_BASE_URL, DEFAULT_DOWNLOAD_FOLDER};
pub use error::{Error, Result, ValidationError};
pub use metadata::{FieldValue, Metadata};
pub use models::{Bookshelf, DownloadedBook, SearchResult};
pub use query::{BulkSearchOptions, SearchOptions, SearchQuery, SortOrder};
pub use renderer::{ChromeRenderer, PdfOptions, PdfRenderer};
