//! Startup seeding of the superuser account.
//!
//! Tokens are only obtainable through a confirmation code, so a fresh
//! database needs one account that can then create the others.

use yamdb_core::roles::Role;
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;

use crate::accounts::{self, Delivery};
use crate::config::BootstrapAdmin;
use crate::error::AppResult;
use crate::state::AppState;

/// Create the configured superuser unless the username already exists.
///
/// Returns the created account, or `None` if it was already present. The
/// new account's confirmation code goes through the configured mailer.
pub async fn ensure_superuser(state: &AppState, admin: &BootstrapAdmin) -> AppResult<Option<User>> {
    if UserRepo::find_by_username(&state.pool, &admin.username)
        .await?
        .is_some()
    {
        tracing::debug!(username = %admin.username, "Bootstrap superuser already exists");
        return Ok(None);
    }

    let input = CreateUser {
        role: Role::Admin,
        is_superuser: true,
        ..CreateUser::signup(admin.username.clone(), admin.email.clone(), String::new())
    };
    let user = accounts::register(state, input, Delivery::Send).await?;
    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap superuser created");
    Ok(Some(user))
}
