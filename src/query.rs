//! Validated search inputs.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const MIN_QUERY_CHARS: usize = 3;

/// A search query with at least three non-whitespace characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Result<Self, ValidationError> {
        let query = query.into();
        let significant = query.chars().filter(|c| !c.is_whitespace()).count();
        if significant == 0 {
            return Err(ValidationError::EmptyQuery);
        }
        if significant < MIN_QUERY_CHARS {
            return Err(ValidationError::QueryTooShort { query });
        }
        Ok(Self(query))
    }

    /// Validates every query up front so a bad entry fails the batch before any request.
    pub fn parse_all<I, S>(queries: I) -> Result<Vec<Self>, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        queries.into_iter().map(Self::new).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-side ordering of search results. Also decides what
/// [`SearchResult::extra`](crate::SearchResult::extra) holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Title,
    ReleaseDate,
    Downloads,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ReleaseDate => "release_date",
            Self::Downloads => "downloads",
        }
    }

    /// Parses a possibly blank sort order; blank means unset.
    pub fn parse_optional(value: &str) -> Result<Option<Self>, ValidationError> {
        if value.chars().all(|c| c == ' ') {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.replace(' ', "").to_lowercase();
        match normalized.as_str() {
            "title" => Ok(Self::Title),
            "release_date" => Ok(Self::ReleaseDate),
            "downloads" => Ok(Self::Downloads),
            _ => Err(ValidationError::UnknownSortOrder(value.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub sort_order: Option<SortOrder>,
    /// Download every result (without a metadata sidecar).
    pub download: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BulkSearchOptions {
    pub sort_order: Option<SortOrder>,
    /// Maximum number of results; `0` means unlimited.
    pub limit: usize,
    /// Accepted for parity with [`SearchOptions`]. Bulk search saves every
    /// result together with its metadata whatever this is set to.
    pub download: bool,
}
