//! Handlers for `/titles/{title_id}/reviews`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::catalog::{validate_score, validate_text};
use yamdb_core::error::CoreError;
use yamdb_core::policy::{Action, ContentKind, Resource};
use yamdb_core::types::DbId;
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::{authenticated, required};
use crate::middleware::auth::CurrentCaller;
use crate::middleware::rbac;
use crate::query::PaginationParams;
use crate::response::PageResponse;
use crate::state::AppState;

/// Request body for creating or patching a review.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub text: Option<String>,
    pub score: Option<i32>,
}

fn resource(author_id: Option<DbId>) -> Resource {
    Resource::Content {
        kind: ContentKind::Review,
        author_id,
    }
}

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(title_id): AppPath<DbId>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<PageResponse<Review>>> {
    rbac::require(&caller, Action::List, resource(None))?;
    ensure_title(&state, title_id).await?;

    let (limit, offset) = params.window();
    let results = ReviewRepo::list(&state.pool, title_id, limit, offset).await?;
    let count = ReviewRepo::count(&state.pool, title_id).await?;
    Ok(Json(PageResponse { count, results }))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// One review per author and title.
pub async fn create(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(title_id): AppPath<DbId>,
    AppJson(input): AppJson<ReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    rbac::require(&caller, Action::Create, resource(None))?;
    let author = authenticated(&caller)?;
    ensure_title(&state, title_id).await?;

    let text = required(input.text, "text")?;
    let score = required(input.score, "score")?;
    validate_text(&text)?;
    validate_score(score)?;

    if ReviewRepo::exists_for_author(&state.pool, title_id, author.user_id).await? {
        return Err(CoreError::Validation(
            "You have already reviewed this title".into(),
        )
        .into());
    }

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            title_id,
            author_id: author.user_id,
            text,
            score,
        },
    )
    .await?;
    tracing::info!(review_id = review.id, title_id, author_id = author.user_id, "Review created");
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    rbac::require(&caller, Action::Retrieve, resource(None))?;
    Ok(Json(load(&state, title_id, review_id).await?))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn update(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<ReviewRequest>,
) -> AppResult<Json<Review>> {
    authenticated(&caller)?;
    let existing = load(&state, title_id, review_id).await?;
    rbac::require(&caller, Action::PartialUpdate, resource(Some(existing.author_id)))?;

    if let Some(text) = &input.text {
        validate_text(text)?;
    }
    if let Some(score) = input.score {
        validate_score(score)?;
    }

    let patch = UpdateReview {
        text: input.text,
        score: input.score,
    };
    let review = ReviewRepo::update(&state.pool, title_id, review_id, &patch)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id))?;
    tracing::info!(review_id, title_id, "Review updated");
    Ok(Json(review))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    authenticated(&caller)?;
    let existing = load(&state, title_id, review_id).await?;
    rbac::require(&caller, Action::Delete, resource(Some(existing.author_id)))?;

    if !ReviewRepo::delete(&state.pool, title_id, review_id).await? {
        return Err(CoreError::not_found("Review", review_id).into());
    }
    tracing::info!(review_id, title_id, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_title(state: &AppState, title_id: DbId) -> AppResult<()> {
    if TitleRepo::exists(&state.pool, title_id).await? {
        Ok(())
    } else {
        Err(CoreError::not_found("Title", title_id).into())
    }
}

/// Load a review that must belong to `title_id`.
pub(crate) async fn load(state: &AppState, title_id: DbId, review_id: DbId) -> AppResult<Review> {
    ensure_title(state, title_id).await?;
    Ok(ReviewRepo::find(&state.pool, title_id, review_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id))?)
}
