//! Field rules for catalog entries (categories, genres, titles) and reviews.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use crate::error::CoreError;

pub const MAX_NAME_LENGTH: usize = 256;
pub const MAX_SLUG_LENGTH: usize = 50;

/// Inclusive bounds of a review score.
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

/// Validate a category/genre/title name.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "'{slug}' is not a valid slug (letters, digits, '-' and '_' only)"
        )));
    }
    Ok(())
}

/// A title's release year may not lie in the future.
pub fn validate_year(year: i32, current_year: i32) -> Result<(), CoreError> {
    if year > current_year {
        return Err(CoreError::Validation(format!(
            "Year {year} is later than the current year {current_year}"
        )));
    }
    Ok(())
}

/// [`validate_year`] against today's UTC date.
pub fn validate_year_now(year: i32) -> Result<(), CoreError> {
    validate_year(year, chrono::Utc::now().year())
}

pub fn validate_score(score: i32) -> Result<(), CoreError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(CoreError::Validation(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }
    Ok(())
}

/// Review and comment bodies must contain something besides whitespace.
pub fn validate_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Text must not be empty".into()));
    }
    Ok(())
}
