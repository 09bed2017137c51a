//! Title model, joined read views and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

/// A title joined with its category and aggregated review rating.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    /// Average review score rounded to an integer; `None` without reviews.
    pub rating: Option<i32>,
}

/// One genre attached to a title, fetched in bulk for a page of titles.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenreRow {
    pub title_id: DbId,
    pub name: String,
    pub slug: String,
}

/// `{name, slug}` reference embedded in title read responses.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SlugRef {
    pub name: String,
    pub slug: String,
}

/// Read representation of a title.
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub genre: Vec<SlugRef>,
    pub category: Option<SlugRef>,
}

impl TitleResponse {
    /// Assemble a response from a row and the genres belonging to it.
    ///
    /// `genres` may contain rows for other titles; only matching ones are kept.
    pub fn assemble(row: TitleRow, genres: &[TitleGenreRow]) -> Self {
        let genre = genres
            .iter()
            .filter(|g| g.title_id == row.id)
            .map(|g| SlugRef {
                name: g.name.clone(),
                slug: g.slug.clone(),
            })
            .collect();
        let category = match (row.category_name, row.category_slug) {
            (Some(name), Some(slug)) => Some(SlugRef { name, slug }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: row.rating,
            description: row.description,
            genre,
            category,
        }
    }
}

/// Write representation of a title: relations rendered as slugs.
#[derive(Debug, Clone, Serialize)]
pub struct TitleWriteResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub genre: Vec<String>,
    pub category: Option<String>,
}

impl From<TitleResponse> for TitleWriteResponse {
    fn from(title: TitleResponse) -> Self {
        Self {
            id: title.id,
            name: title.name,
            year: title.year,
            description: title.description,
            genre: title.genre.into_iter().map(|g| g.slug).collect(),
            category: title.category.map(|c| c.slug),
        }
    }
}

/// DTO for inserting a title with already-resolved relation ids.
#[derive(Debug, Clone)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
}

/// DTO for patching a title.
///
/// `description` and `category_id` are nullable: `Some(None)` clears them.
/// `genre_ids = Some(..)` replaces the genre set.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<DbId>>,
    pub genre_ids: Option<Vec<DbId>>,
}

/// List filters. Text fields are pre-built `ILIKE` patterns.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub genre: Option<String>,
}
