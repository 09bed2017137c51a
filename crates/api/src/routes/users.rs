use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// `{username}` also matches the `me` alias; the handlers resolve it and
/// reject DELETE on it with 405.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// GET    /{username}  -> get_by_username
/// PATCH  /{username}  -> update
/// DELETE /{username}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route(
            "/{username}",
            get(users::get_by_username)
                .patch(users::update)
                .delete(users::delete),
        )
}
