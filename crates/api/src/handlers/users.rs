//! Handlers for the `/users` resource.
//!
//! `/users/{username}` doubles as the self-profile endpoint: the literal
//! segment `me` resolves to the caller's own account, accepts only GET and
//! PATCH, and may not change a plain user's role.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::accounts::{validate_email, validate_name, validate_username, AccountRef};
use yamdb_core::error::CoreError;
use yamdb_core::policy::{AccountTarget, Action, Caller, Resource};
use yamdb_core::profile::{effective_role_change, resolve_target, ProfileTarget};
use yamdb_core::roles::Role;
use yamdb_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use yamdb_db::repositories::UserRepo;

use crate::accounts::{self, Delivery};
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::authenticated;
use crate::middleware::auth::CurrentCaller;
use crate::middleware::rbac;
use crate::query::SearchParams;
use crate::response::PageResponse;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// GET /api/v1/users?search=
pub async fn list(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<PageResponse<UserResponse>>> {
    rbac::require(&caller, Action::List, Resource::Account(AccountTarget::Collection))?;

    let pattern = params.pattern();
    let (limit, offset) = params.window();
    let users = UserRepo::list(&state.pool, pattern.as_deref(), limit, offset).await?;
    let count = UserRepo::count(&state.pool, pattern.as_deref()).await?;

    Ok(Json(PageResponse {
        count,
        results: users.iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/users
///
/// Admin account creation. Role, bio and names are honoured; no
/// confirmation email is sent.
pub async fn create(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    rbac::require(&caller, Action::Create, Resource::Account(AccountTarget::Collection))?;

    let user = accounts::register(
        &state,
        CreateUser {
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
            role: input.role,
            is_superuser: false,
            confirmation_code: String::new(),
        },
        Delivery::Skip,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/v1/users/{username}
pub async fn get_by_username(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(username): AppPath<String>,
) -> AppResult<Json<UserResponse>> {
    let account = AccountRef::parse(&username);
    rbac::require(&caller, Action::Retrieve, Resource::Account(account.target()))?;

    let user = load_target(&state, &caller, &account).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/{username}
pub async fn update(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(username): AppPath<String>,
    AppJson(mut input): AppJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let account = AccountRef::parse(&username);
    rbac::require(&caller, Action::PartialUpdate, Resource::Account(account.target()))?;
    let principal = authenticated(&caller)?;

    let target = load_target(&state, &caller, &account).await?;
    validate_patch(&input)?;
    accounts::ensure_unique(
        &state,
        input.username.as_deref(),
        input.email.as_deref(),
        Some(target.id),
    )
    .await?;

    input.role = effective_role_change(account.scope(), principal.role, input.role);

    let user = UserRepo::update(&state.pool, target.id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &target.username))?;

    tracing::info!(
        user_id = user.id,
        updated_by = principal.user_id,
        role = %user.role,
        "Account updated",
    );
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/users/{username}
pub async fn delete(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppPath(username): AppPath<String>,
) -> AppResult<StatusCode> {
    let account = AccountRef::parse(&username);
    rbac::require(&caller, Action::Delete, Resource::Account(account.target()))?;

    let target = load_target(&state, &caller, &account).await?;
    if !UserRepo::delete(&state.pool, target.id).await? {
        return Err(CoreError::not_found("User", &target.username).into());
    }

    tracing::info!(
        user_id = target.id,
        deleted_by = caller.principal().map(|p| p.user_id),
        "Account deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the account `account` refers to, relative to the caller.
async fn load_target(state: &AppState, caller: &Caller, account: &AccountRef) -> AppResult<User> {
    let principal = authenticated(caller)?;
    let user = match resolve_target(principal, account) {
        ProfileTarget::Own { user_id } => UserRepo::find_by_id(&state.pool, user_id)
            .await?
            .ok_or_else(|| CoreError::not_found("User", &principal.username))?,
        ProfileTarget::ByUsername(username) => UserRepo::find_by_username(&state.pool, username)
            .await?
            .ok_or_else(|| CoreError::not_found("User", username))?,
    };
    Ok(user)
}

fn validate_patch(input: &UpdateUser) -> AppResult<()> {
    if let Some(username) = &input.username {
        validate_username(username)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    if let Some(first_name) = &input.first_name {
        validate_name("first_name", first_name)?;
    }
    if let Some(last_name) = &input.last_name {
        validate_name("last_name", last_name)?;
    }
    Ok(())
}
