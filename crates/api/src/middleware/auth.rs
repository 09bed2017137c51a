//! JWT-based caller extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use yamdb_core::error::CoreError;
use yamdb_core::policy::Caller;
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller behind a request.
///
/// No `Authorization` header yields [`Caller::Anonymous`] so public
/// endpoints stay reachable. A header that is present but malformed,
/// carries an invalid or expired token, or names a deleted account is
/// rejected with 401. The account is re-read from the database so role
/// changes take effect immediately.
///
/// ```ignore
/// async fn my_handler(CurrentCaller(caller): CurrentCaller) -> AppResult<Json<()>> {
///     rbac::require(&caller, Action::Create, Resource::Catalog(CatalogKind::Genre))?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentCaller(pub Caller);

impl FromRequestParts<AppState> for CurrentCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(CurrentCaller(Caller::Anonymous));
        };

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
            })?;

        Ok(CurrentCaller(Caller::Authenticated(user.principal())))
    }
}
