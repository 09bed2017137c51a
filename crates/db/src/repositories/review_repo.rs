//! Repository for the `reviews` table.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::review::{CreateReview, Review, UpdateReview};

/// Select list for [`Review`]; expects `reviews r JOIN users u`.
const COLUMNS: &str = "r.id, r.title_id, r.author_id, u.username AS author, r.text, r.score, r.pub_date";

/// Provides CRUD operations for reviews, always scoped to their title.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review, returning it joined with the author's username.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "WITH r AS (
                INSERT INTO reviews (title_id, author_id, text, score)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {COLUMNS} FROM r JOIN users u ON u.id = r.author_id"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.title_id)
            .bind(input.author_id)
            .bind(&input.text)
            .bind(input.score)
            .fetch_one(pool)
            .await
    }

    /// Find a review by ID within `title_id`.
    pub async fn find(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews r JOIN users u ON u.id = r.author_id
             WHERE r.title_id = $1 AND r.id = $2"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the reviews of a title, oldest first.
    pub async fn list(
        pool: &PgPool,
        title_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews r JOIN users u ON u.id = r.author_id
             WHERE r.title_id = $1
             ORDER BY r.pub_date, r.id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, title_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = $1")
            .bind(title_id)
            .fetch_one(pool)
            .await
    }

    /// Whether `author_id` has already reviewed `title_id`.
    pub async fn exists_for_author(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
    }

    /// Patch a review. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the review does not exist under `title_id`.
    pub async fn update(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "WITH r AS (
                UPDATE reviews SET
                    text = COALESCE($3, text),
                    score = COALESCE($4, score)
                WHERE title_id = $1 AND id = $2
                RETURNING *
             )
             SELECT {COLUMNS} FROM r JOIN users u ON u.id = r.author_id"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(id)
            .bind(&input.text)
            .bind(input.score)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review; its comments cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, title_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE title_id = $1 AND id = $2")
            .bind(title_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
