//! Query-string types for list endpoints.

use serde::Deserialize;
use yamdb_core::search::{contains_pattern, page_window};

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` ready to bind.
    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}

/// `?search=&limit=&offset=` for name/username searches.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    /// The `ILIKE` pattern for `search`, if a non-blank term was given.
    pub fn pattern(&self) -> Option<String> {
        self.search.as_deref().and_then(contains_pattern)
    }

    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}

/// Title list filters. `name`, `category` and `genre` match substrings
/// case-insensitively; `year` is exact.
#[derive(Debug, Default, Deserialize)]
pub struct TitleListParams {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub genre: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TitleListParams {
    pub fn window(&self) -> (i64, i64) {
        page_window(self.limit, self.offset)
    }
}
