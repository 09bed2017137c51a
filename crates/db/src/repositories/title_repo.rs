//! Repository for the `titles` and `title_genres` tables.
//!
//! Reads return fully assembled [`TitleResponse`] values: the title row is
//! joined with its category and rating, and the genres for a whole page are
//! fetched in one extra query.

use sqlx::{PgPool, Postgres, Transaction};
use yamdb_core::types::DbId;

use crate::models::title::{
    CreateTitle, TitleFilter, TitleGenreRow, TitleResponse, TitleRow, UpdateTitle,
};

/// Select list for [`TitleRow`]; expects `titles t LEFT JOIN categories c`.
const ROW_COLUMNS: &str = "\
    t.id, t.name, t.year, t.description, t.category_id, \
    c.name AS category_name, c.slug AS category_slug, \
    (SELECT ROUND(AVG(r.score))::INTEGER FROM reviews r WHERE r.title_id = t.id) AS rating";

/// Filter clause shared by `list` and `count`; binds `$1..$4`.
const FILTER_CLAUSE: &str = "\
    WHERE ($1::TEXT IS NULL OR t.name ILIKE $1) \
      AND ($2::INTEGER IS NULL OR t.year = $2) \
      AND ($3::TEXT IS NULL OR c.slug ILIKE $3) \
      AND ($4::TEXT IS NULL OR EXISTS ( \
            SELECT 1 FROM title_genres tg JOIN genres g ON g.id = tg.genre_id \
            WHERE tg.title_id = t.id AND g.slug ILIKE $4))";

/// Provides CRUD operations for titles and their genre associations.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction, returning the new id.
    pub async fn create(pool: &PgPool, input: &CreateTitle) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        replace_genres(&mut tx, id, &input.genre_ids).await?;
        tx.commit().await?;

        tracing::debug!(title_id = id, genres = input.genre_ids.len(), "Title inserted");
        Ok(id)
    }

    /// Find a title by ID, fully assembled.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TitleResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS}
             FROM titles t LEFT JOIN categories c ON c.id = t.category_id
             WHERE t.id = $1"
        );
        let Some(row) = sqlx::query_as::<_, TitleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let genres = genres_for(pool, &[row.id]).await?;
        Ok(Some(TitleResponse::assemble(row, &genres)))
    }

    /// Whether a title with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles matching `filter`, ordered by ID.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS}
             FROM titles t LEFT JOIN categories c ON c.id = t.category_id
             {FILTER_CLAUSE}
             ORDER BY t.id
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, TitleRow>(&query)
            .bind(&filter.name)
            .bind(filter.year)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let genres = genres_for(pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| TitleResponse::assemble(row, &genres))
            .collect())
    }

    /// Count titles matching `filter`.
    pub async fn count(pool: &PgPool, filter: &TitleFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)
             FROM titles t LEFT JOIN categories c ON c.id = t.category_id
             {FILTER_CLAUSE}"
        );
        sqlx::query_scalar(&query)
            .bind(&filter.name)
            .bind(filter.year)
            .bind(&filter.category)
            .bind(&filter.genre)
            .fetch_one(pool)
            .await
    }

    /// Patch a title. Only non-`None` fields are applied; `Some(None)` on a
    /// nullable field clears it and `genre_ids` replaces the whole genre set.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateTitle) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                category_id = CASE WHEN $6 THEN $7 ELSE category_id END
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(input.description.is_some())
        .bind(input.description.as_ref().and_then(|d| d.as_deref()))
        .bind(input.category_id.is_some())
        .bind(input.category_id.flatten())
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(false);
        }

        if let Some(genre_ids) = &input.genre_ids {
            replace_genres(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a title; its reviews and comments cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Replace the genre links of `title_id` with `genre_ids`.
async fn replace_genres(
    tx: &mut Transaction<'_, Postgres>,
    title_id: DbId,
    genre_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
        .bind(title_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        "INSERT INTO title_genres (title_id, genre_id)
         SELECT $1, UNNEST($2::BIGINT[])
         ON CONFLICT DO NOTHING",
    )
    .bind(title_id)
    .bind(genre_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Fetch the genres of every title in `title_ids` in one query.
async fn genres_for(pool: &PgPool, title_ids: &[DbId]) -> Result<Vec<TitleGenreRow>, sqlx::Error> {
    if title_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, TitleGenreRow>(
        "SELECT tg.title_id, g.name, g.slug
         FROM title_genres tg JOIN genres g ON g.id = tg.genre_id
         WHERE tg.title_id = ANY($1)
         ORDER BY g.slug",
    )
    .bind(title_ids)
    .fetch_all(pool)
    .await
}
