//! Pagination and substring-filter helpers shared by list endpoints.

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum page size for list endpoints.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Turn optional `?limit=&offset=` values into a bindable `(limit, offset)`.
///
/// A missing limit means [`DEFAULT_PAGE_LIMIT`]; anything outside
/// `1..=MAX_PAGE_LIMIT` is pulled back into range. Negative offsets count as 0.
pub fn page_window(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.map_or(DEFAULT_PAGE_LIMIT, |l| l.clamp(1, MAX_PAGE_LIMIT));
    let offset = offset.map_or(0, |o| o.max(0));
    (limit, offset)
}

/// Build an `ILIKE` pattern matching `needle` anywhere in the column.
///
/// `%`, `_` and `\` in the input are escaped so they match literally.
/// Empty or whitespace-only input yields `None` (no filter).
pub fn contains_pattern(needle: &str) -> Option<String> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults() {
        assert_eq!(page_window(None, None), (DEFAULT_PAGE_LIMIT, 0));
    }

    #[test]
    fn window_limit_is_pulled_into_range() {
        assert_eq!(page_window(Some(500), None).0, MAX_PAGE_LIMIT);
        assert_eq!(page_window(Some(0), None).0, 1);
        assert_eq!(page_window(Some(-7), None).0, 1);
        assert_eq!(page_window(Some(35), None).0, 35);
    }

    #[test]
    fn window_offset_is_never_negative() {
        assert_eq!(page_window(None, Some(-3)).1, 0);
        assert_eq!(page_window(None, Some(60)).1, 60);
    }

    #[test]
    fn contains_pattern_wraps_needle() {
        assert_eq!(contains_pattern("rock"), Some("%rock%".to_string()));
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%_off"), Some(r"%50\%\_off%".to_string()));
        assert_eq!(contains_pattern(r"a\b"), Some(r"%a\\b%".to_string()));
    }

    #[test]
    fn contains_pattern_ignores_blank_input() {
        assert_eq!(contains_pattern(""), None);
        assert_eq!(contains_pattern("   "), None);
    }
}
