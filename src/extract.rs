//! HTML extraction for catalog pages.
//!
//! Everything here works on already-fetched markup and never touches the
//! network, so the parsed [`Html`] never lives across an await point.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::models::{Bookshelf, SearchResult};

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(BOOKSHELVES_SELECTOR, "div.bookshelves");
selector!(ANCHOR_SELECTOR, "a");
selector!(RESULTS_SELECTOR, "ul.results");
selector!(BOOKLINK_SELECTOR, "li.booklink");
selector!(TITLE_SELECTOR, "span.title");
selector!(LINK_SELECTOR, "a.link");
selector!(SUBTITLE_SELECTOR, "span.subtitle");
selector!(EXTRA_SELECTOR, "span.extra");
selector!(COVER_SELECTOR, "img.cover-thumb");
selector!(PAGE_LINKS_SELECTOR, "span.links");
selector!(NEXT_PAGE_SELECTOR, "a[accesskey=\"+\"]");
selector!(BIBREC_SELECTOR, "table.bibrec");
selector!(ROW_SELECTOR, "tr");
selector!(HEADER_CELL_SELECTOR, "th");
selector!(DATA_CELL_SELECTOR, "td");

/// Listing entries from one search results page.
#[derive(Debug, Default)]
pub struct ResultsPage {
    pub results: Vec<SearchResult>,
    /// Site-relative href of the next page, if the page links one.
    pub next_page: Option<String>,
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn first_text(parent: ElementRef<'_>, selector: &Selector) -> Option<String> {
    parent.select(selector).next().map(text_of)
}

/// Every shelf linked from the bookshelf index.
pub fn bookshelves(html: &str) -> Result<Vec<Bookshelf>> {
    let document = Html::parse_document(html);
    let container = document
        .select(&BOOKSHELVES_SELECTOR)
        .next()
        .ok_or(Error::MissingMarkup("div.bookshelves"))?;

    Ok(container
        .select(&ANCHOR_SELECTOR)
        .map(|anchor| Bookshelf {
            title: text_of(anchor),
            link: anchor.value().attr("href").map(str::to_string),
        })
        .collect())
}

/// Per-entry extraction outcomes for one results page, so a caller can act
/// on the entries before a malformed one.
#[derive(Debug, Default)]
pub struct ListingPage {
    pub entries: Vec<Result<SearchResult>>,
    pub next_page: Option<String>,
}

/// Extracts at most `max` listing entries (all when `None`) and the next-page link.
///
/// A page without a results list is treated as an empty page.
pub fn results_page(html: &str, max: Option<usize>) -> Result<ResultsPage> {
    let page = listing_page(html, max);
    Ok(ResultsPage {
        results: page.entries.into_iter().collect::<Result<Vec<_>>>()?,
        next_page: page.next_page,
    })
}

/// Like [`results_page`], but keeps each entry's outcome in page order
/// instead of failing the whole page.
pub fn listing_page(html: &str, max: Option<usize>) -> ListingPage {
    let document = Html::parse_document(html);

    let entries: Vec<Result<SearchResult>> = match document.select(&RESULTS_SELECTOR).next() {
        Some(list) => list
            .select(&BOOKLINK_SELECTOR)
            .take(max.unwrap_or(usize::MAX))
            .map(listing_entry)
            .collect(),
        None => Vec::new(),
    };

    let next_page = document
        .select(&PAGE_LINKS_SELECTOR)
        .next()
        .and_then(|links| links.select(&NEXT_PAGE_SELECTOR).next())
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::to_string);

    ListingPage { entries, next_page }
}

/// One `li.booklink` entry. Extraction is the same whatever the sort order.
pub fn listing_entry(book: ElementRef<'_>) -> Result<SearchResult> {
    let title = first_text(book, &TITLE_SELECTOR).ok_or(Error::MissingMarkup("span.title"))?;
    let link = book
        .select(&LINK_SELECTOR)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .ok_or(Error::MissingMarkup("a.link[href]"))?
        .to_string();

    Ok(SearchResult {
        title,
        author: first_text(book, &SUBTITLE_SELECTOR),
        extra: first_text(book, &EXTRA_SELECTOR),
        link,
        image: book
            .select(&COVER_SELECTOR)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string),
    })
}

/// The detail page's bibliographic table.
pub fn bibliographic_record(html: &str) -> Result<Metadata> {
    let document = Html::parse_document(html);
    let table = document
        .select(&BIBREC_SELECTOR)
        .next()
        .ok_or(Error::MissingMarkup("table.bibrec"))?;

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for row in table.select(&ROW_SELECTOR) {
        labels.extend(
            row.select(&HEADER_CELL_SELECTOR)
                .map(|cell| text_of(cell).trim().to_lowercase().replace(' ', "_")),
        );
        values.extend(row.select(&DATA_CELL_SELECTOR).map(|cell| text_of(cell).trim().to_string()));
    }

    Metadata::from_cells(labels, values)
}
