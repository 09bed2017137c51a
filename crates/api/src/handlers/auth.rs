//! Handlers for the `/auth` resource (signup, token exchange).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use yamdb_core::policy::{Action, Resource};
use yamdb_db::models::user::CreateUser;

use crate::accounts::{self, Delivery};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::required;
use crate::middleware::auth::CurrentCaller;
use crate::middleware::rbac;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub confirmation_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register an account and email its confirmation code. Responds 200 with
/// the submitted body unchanged; the code is never part of the response.
/// Admin callers register accounts without triggering an email.
pub async fn signup(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    AppJson(body): AppJson<Value>,
) -> AppResult<Json<Value>> {
    rbac::require(&caller, Action::Create, Resource::Registration)?;

    let input: SignupRequest = serde_json::from_value(body.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid signup body: {e}")))?;
    let username = required(input.username, "username")?;
    let email = required(input.email, "email")?;

    let delivery = if caller.is_admin() {
        Delivery::Skip
    } else {
        Delivery::Send
    };
    accounts::register(
        &state,
        CreateUser::signup(username, email, String::new()),
        delivery,
    )
    .await?;

    Ok(Json(body))
}

/// POST /api/v1/auth/token
///
/// Exchange `{username, confirmation_code}` for `{token}`.
pub async fn token(
    State(state): State<AppState>,
    AppJson(input): AppJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = accounts::exchange_code(
        &state,
        input.username.as_deref(),
        input.confirmation_code.as_deref(),
    )
    .await?;
    Ok(Json(TokenResponse { token }))
}
