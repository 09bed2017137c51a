//! Handlers for `/titles/{title_id}/reviews/{review_id}/comments`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::catalog::validate_text;
use yamdb_core::error::CoreError;
use yamdb_core::policy::{Action, ContentKind, Resource};
use yamdb_core::types::DbId;
use yamdb_db::models::comment::{Comment, CreateComment};
use yamdb_db::repositories::CommentRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::reviews;
use crate::handlers::{authenticated, required};
use crate::middleware::auth::CurrentCaller;
use crate::middleware::rbac;
use crate::query::PaginationParams;
use crate::response::PageResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

fn resource(author_id: Option<DbId>) -> Resource {
    Resource::Content {
        kind: ContentKind::Comment,
        author_id,
    }
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<PageResponse<Comment>>> {
    rbac::require(&caller, Action::List, resource(None))?;
    reviews::load(&state, title_id, review_id).await?;

    let (limit, offset) = params.window();
    let results = CommentRepo::list(&state.pool, review_id, limit, offset).await?;
    let count = CommentRepo::count(&state.pool, review_id).await?;
    Ok(Json(PageResponse { count, results }))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    rbac::require(&caller, Action::Create, resource(None))?;
    let author = authenticated(&caller)?;
    reviews::load(&state, title_id, review_id).await?;

    let text = required(input.text, "text")?;
    validate_text(&text)?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            review_id,
            author_id: author.user_id,
            text,
        },
    )
    .await?;
    tracing::info!(comment_id = comment.id, review_id, author_id = author.user_id, "Comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath((title_id, review_id, comment_id)): AppPath<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    rbac::require(&caller, Action::Retrieve, resource(None))?;
    Ok(Json(load(&state, title_id, review_id, comment_id).await?))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath((title_id, review_id, comment_id)): AppPath<(DbId, DbId, DbId)>,
    AppJson(input): AppJson<CommentRequest>,
) -> AppResult<Json<Comment>> {
    authenticated(&caller)?;
    let existing = load(&state, title_id, review_id, comment_id).await?;
    rbac::require(&caller, Action::PartialUpdate, resource(Some(existing.author_id)))?;

    let Some(text) = input.text else {
        return Ok(Json(existing));
    };
    validate_text(&text)?;

    let comment = CommentRepo::update_text(&state.pool, review_id, comment_id, &text)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id))?;
    tracing::info!(comment_id, review_id, "Comment updated");
    Ok(Json(comment))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath((title_id, review_id, comment_id)): AppPath<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    authenticated(&caller)?;
    let existing = load(&state, title_id, review_id, comment_id).await?;
    rbac::require(&caller, Action::Delete, resource(Some(existing.author_id)))?;

    if !CommentRepo::delete(&state.pool, review_id, comment_id).await? {
        return Err(CoreError::not_found("Comment", comment_id).into());
    }
    tracing::info!(comment_id, review_id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn load(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    reviews::load(state, title_id, review_id).await?;
    Ok(CommentRepo::find(&state.pool, review_id, comment_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id))?)
}
