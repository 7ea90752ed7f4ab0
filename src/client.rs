use std::fmt;
use std::path::Path;

use colored::*;
use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{ClientConfig, Endpoints};
use crate::error::{Error, Result};
use crate::extract;
use crate::metadata::Metadata;
use crate::models::{Bookshelf, DownloadedBook, SearchResult};
use crate::query::{BulkSearchOptions, SearchOptions, SearchQuery, SortOrder};
use crate::renderer::{ChromeRenderer, PdfRenderer};

const BOOK_FILE: &str = "book.pdf";
const METADATA_FILE: &str = "metadata.txt";

/// Client for the Project Gutenberg catalog.
///
/// Every operation runs its requests one after another; nothing is cached
/// between calls.
pub struct Gutenberg {
    config: ClientConfig,
    endpoints: Endpoints,
    http: reqwest::Client,
    renderer: Box<dyn PdfRenderer>,
}

impl Gutenberg {
    /// Builds a client that renders PDFs through headless Chromium.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_renderer(config, ChromeRenderer::default())
    }

    pub fn with_renderer(config: ClientConfig, renderer: impl PdfRenderer + 'static) -> Result<Self> {
        let endpoints = Endpoints::new(&config.base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            config,
            endpoints,
            http,
            renderer: Box::new(renderer),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Titles of every bookshelf on the index page.
    pub async fn list_bookshelves(&self) -> Result<Vec<String>> {
        let shelves = self.list_bookshelves_with_links().await?;
        Ok(shelves.into_iter().map(|shelf| shelf.title).collect())
    }

    pub async fn list_bookshelves_with_links(&self) -> Result<Vec<Bookshelf>> {
        let html = self.fetch(self.endpoints.bookshelf.clone()).await?;
        let shelves = extract::bookshelves(&html)?;
        self.summary(format_args!("{} bookshelves found", shelves.len()));
        Ok(shelves)
    }

    /// Searches the catalog and returns the first page of results.
    pub async fn quick_search(
        &self,
        query: &SearchQuery,
        options: SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let html = self.fetch(self.search_url(query, options.sort_order)).await?;
        let results = extract::results_page(&html, None)?.results;
        self.summary(format_args!("{} book(s) found for \"{}\"", results.len(), query));

        if options.download {
            for book in &results {
                self.download(&book.link, &self.config.download_folder, false)
                    .await?;
            }
        }

        Ok(results)
    }

    /// Runs [`quick_search`](Self::quick_search) for each query and
    /// concatenates the results in query order.
    ///
    /// A query whose page fetch fails contributes no results.
    pub async fn quick_search_many(
        &self,
        queries: &[SearchQuery],
        options: SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        for query in queries {
            let outcome = self.quick_search(query, options).await;
            absorb(query, outcome, &mut results)?;
        }
        Ok(results)
    }

    /// Walks every results page until the limit, an empty page, the last page
    /// or a failed page fetch.
    ///
    /// Every result found is downloaded into the default folder together with
    /// its metadata sidecar, whether or not `options.download` is set.
    pub async fn bulk_search(
        &self,
        query: &SearchQuery,
        options: BulkSearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let limited = options.limit > 0;
        let mut html = self.fetch(self.search_url(query, options.sort_order)).await?;
        let mut results: Vec<SearchResult> = Vec::new();
        let mut page_number = 1;

        loop {
            let remaining = limited.then(|| options.limit - results.len());
            let page = extract::listing_page(&html, remaining);
            if page.entries.is_empty() {
                break;
            }

            // Entries ahead of a malformed one are saved before it aborts the search.
            for entry in page.entries {
                let book = entry?;
                self.download(&book.link, &self.config.download_folder, true)
                    .await?;
                results.push(book);
            }

            if limited && results.len() >= options.limit {
                break;
            }

            let Some(next_page) = page.next_page else {
                break;
            };

            match self.fetch(self.endpoints.resolve(&next_page)?).await {
                Ok(body) => html = body,
                Err(Error::HttpStatus { url, status }) => {
                    warn!(
                        "Stopping after {} page(s) and {} result(s): HTTP {} fetching {}",
                        page_number,
                        results.len(),
                        status,
                        url
                    );
                    return Ok(results);
                }
                Err(e) => return Err(e),
            }
            page_number += 1;
        }

        self.summary(format_args!(
            "scanned {} page(s) and found {} result(s) for \"{}\"",
            page_number,
            results.len(),
            query
        ));
        Ok(results)
    }

    /// Runs [`bulk_search`](Self::bulk_search) for each query and
    /// concatenates the results in query order.
    pub async fn bulk_search_many(
        &self,
        queries: &[SearchQuery],
        options: BulkSearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        for query in queries {
            let outcome = self.bulk_search(query, options).await;
            absorb(query, outcome, &mut results)?;
        }
        Ok(results)
    }

    /// Bibliographic metadata from a book's detail page, e.g. `/ebooks/84`.
    pub async fn metadata(&self, link: &str) -> Result<Metadata> {
        let html = self.fetch(self.endpoints.resolve(link)?).await?;
        extract::bibliographic_record(&html)
    }

    /// One metadata outcome per link, in link order.
    pub async fn metadata_many<S: AsRef<str>>(&self, links: &[S]) -> Vec<Result<Metadata>> {
        let mut outcomes = Vec::with_capacity(links.len());
        for link in links {
            outcomes.push(self.metadata(link.as_ref()).await);
        }
        outcomes
    }

    /// Renders a book to `<folder>/<book_id>/book.pdf`, optionally writing
    /// its metadata to `metadata.txt` next to it.
    pub async fn download(
        &self,
        link: &str,
        folder: impl AsRef<Path>,
        save_metadata: bool,
    ) -> Result<DownloadedBook> {
        let book_id = book_id(link)?;
        let book_dir = folder.as_ref().join(book_id);
        fs::create_dir_all(&book_dir)
            .await
            .map_err(|e| Error::io(&book_dir, e))?;

        let source = self.endpoints.resolve(&format!("{link}.html.images"))?;
        let pdf = book_dir.join(BOOK_FILE);
        self.renderer.render(&source, &pdf).await?;

        let metadata = if save_metadata {
            let metadata = self.metadata(link).await?;
            let path = book_dir.join(METADATA_FILE);
            fs::write(&path, metadata.to_string())
                .await
                .map_err(|e| Error::io(&path, e))?;
            Some(path)
        } else {
            None
        };

        self.summary(format_args!(
            "Saved book {} to \"{}\"",
            book_id,
            book_dir.display().to_string().blue()
        ));

        Ok(DownloadedBook {
            book_id: book_id.to_string(),
            pdf,
            metadata,
        })
    }

    /// Downloads each link in turn; the first failure aborts the batch.
    pub async fn download_many<S: AsRef<str>>(
        &self,
        links: &[S],
        folder: impl AsRef<Path>,
        save_metadata: bool,
    ) -> Result<Vec<DownloadedBook>> {
        let mut books = Vec::with_capacity(links.len());
        for link in links {
            books.push(
                self.download(link.as_ref(), folder.as_ref(), save_metadata)
                    .await?,
            );
        }
        Ok(books)
    }

    fn search_url(&self, query: &SearchQuery, sort_order: Option<SortOrder>) -> Url {
        let mut url = self.endpoints.search.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query.as_str());
            if let Some(sort_order) = sort_order {
                pairs.append_pair("sort_order", sort_order.as_str());
            }
        }
        url
    }

    async fn fetch(&self, url: Url) -> Result<String> {
        debug!("GET {}", url.as_str().green());
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    fn summary(&self, message: fmt::Arguments<'_>) {
        if self.config.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }
}

/// The third `/`-separated segment of a link: `/ebooks/84` gives `84`.
fn book_id(link: &str) -> Result<&str> {
    link.split('/')
        .nth(2)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| Error::InvalidLink(link.to_string()))
}

fn absorb(
    query: &SearchQuery,
    outcome: Result<Vec<SearchResult>>,
    results: &mut Vec<SearchResult>,
) -> Result<()> {
    match outcome {
        Ok(found) => results.extend(found),
        Err(Error::HttpStatus { url, status }) => {
            warn!("Skipping query \"{}\": HTTP {} fetching {}", query, status, url);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
