//! HTTP handlers, one module per resource.

pub mod auth;
pub mod categories;
pub mod comments;
pub mod genres;
pub mod reviews;
pub mod titles;
pub mod users;

use yamdb_core::error::CoreError;
use yamdb_core::policy::{Caller, Principal};

use crate::error::AppResult;

/// The authenticated principal, or 401.
///
/// Mutations on existing content check authentication before looking the
/// target up, so anonymous callers never learn whether it exists.
pub(crate) fn authenticated(caller: &Caller) -> AppResult<&Principal> {
    caller.principal().ok_or_else(|| {
        CoreError::Unauthorized("Authentication credentials were not provided".into()).into()
    })
}

/// Unwrap a body field that is mandatory for this operation.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| CoreError::Validation(format!("'{field}' is required")).into())
}
