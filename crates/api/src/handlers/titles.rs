//! Handlers for the `/titles` resource.
//!
//! Reads return the nested shape (`category`/`genre` as `{name, slug}`
//! objects, plus `rating`); writes accept and return slugs.

use std::collections::BTreeSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::catalog::{validate_name, validate_year_now};
use yamdb_core::error::CoreError;
use yamdb_core::patch::nullable;
use yamdb_core::policy::{Action, CatalogKind, Resource};
use yamdb_core::search::contains_pattern;
use yamdb_core::types::DbId;
use yamdb_db::models::title::{
    CreateTitle, TitleFilter, TitleResponse, TitleWriteResponse, UpdateTitle,
};
use yamdb_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::required;
use crate::middleware::auth::CurrentCaller;
use crate::middleware::rbac;
use crate::query::TitleListParams;
use crate::response::PageResponse;
use crate::state::AppState;

const RESOURCE: Resource = Resource::Catalog(CatalogKind::Title);

/// Request body for `POST /titles` and `PATCH /titles/{id}`.
///
/// Create requires `name`, `year` and `genre`. `description` and `category`
/// are nullable: on PATCH an explicit `null` clears them.
#[derive(Debug, Default, Deserialize)]
pub struct TitleWriteRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    /// Genre slugs.
    pub genre: Option<Vec<String>>,
    /// Category slug.
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
}

/// GET /api/v1/titles?name=&year=&category=&genre=
pub async fn list(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppQuery(params): AppQuery<TitleListParams>,
) -> AppResult<Json<PageResponse<TitleResponse>>> {
    rbac::require(&caller, Action::List, RESOURCE)?;

    let filter = TitleFilter {
        name: params.name.as_deref().and_then(contains_pattern),
        year: params.year,
        category: params.category.as_deref().and_then(contains_pattern),
        genre: params.genre.as_deref().and_then(contains_pattern),
    };
    let (limit, offset) = params.window();

    let results = TitleRepo::list(&state.pool, &filter, limit, offset).await?;
    let count = TitleRepo::count(&state.pool, &filter).await?;
    Ok(Json(PageResponse { count, results }))
}

/// POST /api/v1/titles
pub async fn create(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppJson(input): AppJson<TitleWriteRequest>,
) -> AppResult<(StatusCode, Json<TitleWriteResponse>)> {
    rbac::require(&caller, Action::Create, RESOURCE)?;

    let name = required(input.name, "name")?;
    let year = required(input.year, "year")?;
    let genre = required(input.genre, "genre")?;

    validate_name(&name)?;
    validate_year_now(year)?;
    let category_id = match input.category.flatten() {
        Some(slug) => Some(resolve_category(&state, &slug).await?),
        None => None,
    };
    let genre_ids = resolve_genres(&state, &genre).await?;

    let id = TitleRepo::create(
        &state.pool,
        &CreateTitle {
            name,
            year,
            description: input.description.flatten(),
            category_id,
            genre_ids,
        },
    )
    .await?;
    tracing::info!(title_id = id, "Title created");

    let title = load(&state, id).await?;
    Ok((StatusCode::CREATED, Json(title.into())))
}

/// GET /api/v1/titles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<TitleResponse>> {
    rbac::require(&caller, Action::Retrieve, RESOURCE)?;
    Ok(Json(load(&state, id).await?))
}

/// PATCH /api/v1/titles/{id}
pub async fn update(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<TitleWriteRequest>,
) -> AppResult<Json<TitleWriteResponse>> {
    rbac::require(&caller, Action::PartialUpdate, RESOURCE)?;

    if !TitleRepo::exists(&state.pool, id).await? {
        return Err(CoreError::not_found("Title", id).into());
    }
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(year) = input.year {
        validate_year_now(year)?;
    }
    let category_id = match &input.category {
        Some(Some(slug)) => Some(Some(resolve_category(&state, slug).await?)),
        Some(None) => Some(None),
        None => None,
    };
    let genre_ids = match &input.genre {
        Some(slugs) => Some(resolve_genres(&state, slugs).await?),
        None => None,
    };

    let patch = UpdateTitle {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
        genre_ids,
    };
    if !TitleRepo::update(&state.pool, id, &patch).await? {
        return Err(CoreError::not_found("Title", id).into());
    }
    tracing::info!(title_id = id, "Title updated");

    let title = load(&state, id).await?;
    Ok(Json(title.into()))
}

/// DELETE /api/v1/titles/{id}
pub async fn delete(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    rbac::require(&caller, Action::Delete, RESOURCE)?;

    if TitleRepo::delete(&state.pool, id).await? {
        tracing::info!(title_id = id, "Title deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Title", id).into())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load(state: &AppState, id: DbId) -> AppResult<TitleResponse> {
    Ok(TitleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", id))?)
}

async fn resolve_category(state: &AppState, slug: &str) -> AppResult<DbId> {
    let category = CategoryRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| CoreError::Validation(format!("Category '{slug}' does not exist")))?;
    Ok(category.id)
}

/// Map genre slugs to ids, failing on the first unknown slug.
async fn resolve_genres(state: &AppState, slugs: &[String]) -> AppResult<Vec<DbId>> {
    let wanted: BTreeSet<&str> = slugs.iter().map(String::as_str).collect();
    let found = GenreRepo::find_by_slugs(&state.pool, slugs).await?;

    if let Some(missing) = wanted
        .iter()
        .find(|slug| !found.iter().any(|g| g.slug == **slug))
    {
        return Err(CoreError::Validation(format!("Genre '{missing}' does not exist")).into());
    }
    Ok(found.into_iter().map(|g| g.id).collect())
}
