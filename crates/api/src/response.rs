//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Paginated `{ "count": N, "results": [...] }` envelope used by every list
/// endpoint. `count` is the total number of matches, not the page length.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub count: i64,
    pub results: Vec<T>,
}
