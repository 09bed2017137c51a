//! Account registration and token issuance.
//!
//! Shared by the `/auth` handlers, admin account creation and the startup
//! superuser seed so every new account goes through the same validation,
//! uniqueness checks and confirmation-code delivery.

use yamdb_core::accounts::{validate_email, validate_name, validate_username};
use yamdb_core::confirmation::{
    confirmation_code_matches, confirmation_message, generate_confirmation_code,
    CONFIRMATION_SUBJECT,
};
use yamdb_core::error::CoreError;
use yamdb_core::types::DbId;
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;
use yamdb_mail::Mailer;

use crate::auth::jwt::{generate_access_token, JwtConfig};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Whether a newly registered account is sent its confirmation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Send,
    Skip,
}

/// Validate the identity fields shared by signup, admin creation and updates.
pub fn validate_identity(username: &str, email: &str) -> AppResult<()> {
    validate_username(username)?;
    validate_email(email)?;
    Ok(())
}

/// Reject a username or email already held by an account other than `except`.
pub async fn ensure_unique(
    state: &AppState,
    username: Option<&str>,
    email: Option<&str>,
    except: Option<DbId>,
) -> AppResult<()> {
    if let Some(username) = username {
        if let Some(existing) = UserRepo::find_by_username(&state.pool, username).await? {
            if Some(existing.id) != except {
                return Err(CoreError::Validation(format!(
                    "A user with username '{username}' already exists"
                ))
                .into());
            }
        }
    }
    if let Some(email) = email {
        if let Some(existing) = UserRepo::find_by_email(&state.pool, email).await? {
            if Some(existing.id) != except {
                return Err(CoreError::Validation(format!(
                    "A user with email '{email}' already exists"
                ))
                .into());
            }
        }
    }
    Ok(())
}

/// Create an account with a fresh confirmation code.
///
/// Any `confirmation_code` already on `input` is replaced. Mail failures are
/// logged and swallowed; the account is kept either way.
pub async fn register(state: &AppState, mut input: CreateUser, delivery: Delivery) -> AppResult<User> {
    validate_identity(&input.username, &input.email)?;
    validate_name("first_name", &input.first_name)?;
    validate_name("last_name", &input.last_name)?;
    ensure_unique(state, Some(&input.username), Some(&input.email), None).await?;

    input.confirmation_code = generate_confirmation_code();
    let user = UserRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "Account registered");

    if delivery == Delivery::Send {
        send_confirmation_code(state.mailer.as_ref(), &user).await;
    }
    Ok(user)
}

/// Email the account its confirmation code. Never fails.
pub async fn send_confirmation_code(mailer: &dyn Mailer, user: &User) {
    let body = confirmation_message(&user.username, &user.confirmation_code);
    if let Err(e) = mailer.send(&user.email, CONFIRMATION_SUBJECT, &body).await {
        tracing::warn!(user_id = user.id, error = %e, "Failed to deliver confirmation code");
    }
}

/// Exchange a username and confirmation code for an access token.
///
/// Both fields must be present before any lookup happens. The code stays
/// valid after a successful exchange.
pub async fn exchange_code(
    state: &AppState,
    username: Option<&str>,
    code: Option<&str>,
) -> AppResult<String> {
    let (Some(username), Some(code)) = (username, code) else {
        return Err(CoreError::MalformedRequest(
            "Both 'username' and 'confirmation_code' are required".into(),
        )
        .into());
    };

    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", username))?;

    if !confirmation_code_matches(&user.confirmation_code, code) {
        tracing::info!(user_id = user.id, "Confirmation code mismatch");
        return Err(CoreError::Validation("Invalid confirmation code".into()).into());
    }

    let token = issue_token(&user, &state.config.jwt)?;
    tracing::info!(user_id = user.id, "Access token issued");
    Ok(token)
}

fn issue_token(user: &User, config: &JwtConfig) -> AppResult<String> {
    generate_access_token(user.id, &user.username, user.role, config)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))
}
