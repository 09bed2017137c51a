//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::catalog::{validate_name, validate_slug};
use yamdb_core::error::CoreError;
use yamdb_core::policy::{Action, CatalogKind, Resource};
use yamdb_db::models::category::{Category, CreateCategory};
use yamdb_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::CurrentCaller;
use crate::middleware::rbac;
use crate::query::SearchParams;
use crate::response::PageResponse;
use crate::state::AppState;

const RESOURCE: Resource = Resource::Catalog(CatalogKind::Category);

/// GET /api/v1/categories?search=
pub async fn list(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<PageResponse<Category>>> {
    rbac::require(&caller, Action::List, RESOURCE)?;

    let pattern = params.pattern();
    let (limit, offset) = params.window();
    let results = CategoryRepo::list(&state.pool, pattern.as_deref(), limit, offset).await?;
    let count = CategoryRepo::count(&state.pool, pattern.as_deref()).await?;
    Ok(Json(PageResponse { count, results }))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    rbac::require(&caller, Action::Create, RESOURCE)?;

    validate_name(&input.name)?;
    validate_slug(&input.slug)?;
    if CategoryRepo::find_by_slug(&state.pool, &input.slug).await?.is_some() {
        return Err(CoreError::Validation(format!(
            "Category with slug '{}' already exists",
            input.slug
        ))
        .into());
    }

    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/v1/categories/{slug}
///
/// Titles in the category are kept with no category.
pub async fn delete(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(slug): AppPath<String>,
) -> AppResult<StatusCode> {
    rbac::require(&caller, Action::Delete, RESOURCE)?;

    if CategoryRepo::delete_by_slug(&state.pool, &slug).await? {
        tracing::info!(%slug, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Category", slug).into())
    }
}
