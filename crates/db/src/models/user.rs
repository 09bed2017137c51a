//! User account model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yamdb_core::policy::Principal;
use yamdb_core::roles::Role;
use yamdb_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the confirmation code -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_superuser: bool,
    pub confirmation_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The identity the authorization policy sees for this account.
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            username: self.username.clone(),
            role: self.role,
            is_superuser: self.is_superuser,
        }
    }
}

/// Public account representation (no id, no confirmation code).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            role: user.role,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub role: Role,
    pub is_superuser: bool,
    pub confirmation_code: String,
}

impl CreateUser {
    /// A plain `user` account with only the signup fields set.
    pub fn signup(username: String, email: String, confirmation_code: String) -> Self {
        Self {
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            bio: None,
            role: Role::User,
            is_superuser: false,
            confirmation_code,
        }
    }
}

/// DTO for updating an existing user. All fields are optional.
///
/// `bio` is nullable: `Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "yamdb_core::patch::nullable")]
    pub bio: Option<Option<String>>,
    pub role: Option<Role>,
}
