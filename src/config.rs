use std::path::PathBuf;

use url::Url;

use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://www.gutenberg.org";
pub const DEFAULT_DOWNLOAD_FOLDER: &str = "books";

const BOOKSHELF_PATH: &str = "/ebooks/bookshelf/";
const SEARCH_PATH: &str = "/ebooks/search/";
const BOOKSHELVES_SEARCH_PATH: &str = "/ebooks/bookshelves/search/";

/// Construction-time settings for [`Gutenberg`](crate::Gutenberg).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Log per-operation summaries at `info` level.
    pub verbose: bool,
    /// Folder that search-triggered downloads land in.
    pub download_folder: PathBuf,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            verbose: false,
            download_folder: PathBuf::from(DEFAULT_DOWNLOAD_FOLDER),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn download_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.download_folder = folder.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Resolved URL templates for the catalog.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub base: Url,
    pub bookshelf: Url,
    pub search: Url,
    /// Shelf search page. No operation uses it yet.
    pub bookshelves_search: Url,
}

impl Endpoints {
    /// Any path prefix on `base_url` (a mirror under `/gutenberg`, say) is
    /// kept in front of every catalog path.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut endpoints = Self {
            bookshelf: base.clone(),
            search: base.clone(),
            bookshelves_search: base.clone(),
            base,
        };
        endpoints.bookshelf = endpoints.resolve(BOOKSHELF_PATH)?;
        endpoints.search = endpoints.resolve(SEARCH_PATH)?;
        endpoints.bookshelves_search = endpoints.resolve(BOOKSHELVES_SEARCH_PATH)?;
        Ok(endpoints)
    }

    /// Absolute URL for a site-relative path such as `/ebooks/84`, placed
    /// under the base path.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }
}
