pub mod auth;
pub mod categories;
pub mod genres;
pub mod health;
pub mod titles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                          register (public)
/// /auth/token                                           exchange code for token (public)
///
/// /categories                                           list, create
/// /categories/{slug}                                    delete
/// /genres                                               list, create
/// /genres/{slug}                                        delete
///
/// /titles                                               list (filters), create
/// /titles/{id}                                          get, patch, delete
/// /titles/{title_id}/reviews                            list, create
/// /titles/{title_id}/reviews/{id}                       get, patch, delete
/// /titles/{title_id}/reviews/{review_id}/comments       list, create
/// /titles/{title_id}/reviews/{review_id}/comments/{id}  get, patch, delete
///
/// /users                                                list, create (admin)
/// /users/{username}                                     get, patch, delete (admin)
/// /users/me                                             get, patch (any authenticated)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/genres", genres::router())
        .nest("/titles", titles::router())
        .nest("/users", users::router())
}
