//! Handlers for the `/genres` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::catalog::{validate_name, validate_slug};
use yamdb_core::error::CoreError;
use yamdb_core::policy::{Action, CatalogKind, Resource};
use yamdb_db::models::genre::{CreateGenre, Genre};
use yamdb_db::repositories::GenreRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::CurrentCaller;
use crate::middleware::rbac;
use crate::query::SearchParams;
use crate::response::PageResponse;
use crate::state::AppState;

const RESOURCE: Resource = Resource::Catalog(CatalogKind::Genre);

/// GET /api/v1/genres?search=
pub async fn list(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<PageResponse<Genre>>> {
    rbac::require(&caller, Action::List, RESOURCE)?;

    let pattern = params.pattern();
    let (limit, offset) = params.window();
    let results = GenreRepo::list(&state.pool, pattern.as_deref(), limit, offset).await?;
    let count = GenreRepo::count(&state.pool, pattern.as_deref()).await?;
    Ok(Json(PageResponse { count, results }))
}

/// POST /api/v1/genres
pub async fn create(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppJson(input): AppJson<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    rbac::require(&caller, Action::Create, RESOURCE)?;

    validate_name(&input.name)?;
    validate_slug(&input.slug)?;
    if GenreRepo::find_by_slug(&state.pool, &input.slug).await?.is_some() {
        return Err(CoreError::Validation(format!(
            "Genre with slug '{}' already exists",
            input.slug
        ))
        .into());
    }

    let genre = GenreRepo::create(&state.pool, &input).await?;
    tracing::info!(genre_id = genre.id, slug = %genre.slug, "Genre created");
    Ok((StatusCode::CREATED, Json(genre)))
}

/// DELETE /api/v1/genres/{slug}
///
/// Titles keep existing; only their association with the genre is removed.
pub async fn delete(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(slug): AppPath<String>,
) -> AppResult<StatusCode> {
    rbac::require(&caller, Action::Delete, RESOURCE)?;

    if GenreRepo::delete_by_slug(&state.pool, &slug).await? {
        tracing::info!(%slug, "Genre deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Genre", slug).into())
    }
}
