//! Repository for the `genres` table.

use sqlx::PgPool;

use crate::models::genre::{CreateGenre, Genre};

const COLUMNS: &str = "id, name, slug";

/// Provides create/list/delete operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> Result<Genre, sqlx::Error> {
        let query = format!(
            "INSERT INTO genres (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE slug = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every genre whose slug is in `slugs`. Unknown slugs are simply
    /// absent from the result.
    pub async fn find_by_slugs(pool: &PgPool, slugs: &[String]) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE slug = ANY($1) ORDER BY slug");
        sqlx::query_as::<_, Genre>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// List genres ordered by name, optionally filtered by an `ILIKE`
    /// pattern on the name.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM genres
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
             ORDER BY name, id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM genres WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
        )
        .bind(search)
        .fetch_one(pool)
        .await
    }

    /// Delete a genre by slug. Title associations are removed with it.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_by_slug(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
