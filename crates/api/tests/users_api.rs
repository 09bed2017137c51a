//! HTTP-level integration tests for account administration and the
//! `me` self-profile alias.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_superuser, create_user, delete, delete_auth, get, get_auth,
    patch_json_auth, post_json_auth, put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;
use yamdb_core::roles::Role;
use yamdb_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Self-profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn me_requires_authentication(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_returns_own_profile(pool: PgPool) {
    let (_user, token) = create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "alice");
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["role"], "user");
    assert!(json.get("confirmation_code").is_none());
    assert!(json.get("id").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn plain_user_cannot_escalate_via_me(pool: PgPool) {
    let (user, token) = create_user(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool.clone());

    let response = patch_json_auth(
        app,
        "/api/v1/users/me",
        json!({"role": "admin", "bio": "Cinephile"}),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "user");
    assert_eq!(json["bio"], "Cinephile");

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::User);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_patch_null_clears_bio(pool: PgPool) {
    let (user, token) = create_user(&pool, "dora", Role::User).await;

    let app = common::build_test_app(pool.clone());
    let response =
        patch_json_auth(app, "/api/v1/users/me", json!({"bio": "Noir fan"}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["bio"], "Noir fan");

    let app = common::build_test_app(pool.clone());
    let response =
        patch_json_auth(app, "/api/v1/users/me", json!({"first_name": "Dora"}), &token).await;
    assert_eq!(body_json(response).await["bio"], "Noir fan");

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(app, "/api/v1/users/me", json!({"bio": null}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["bio"].is_null());
    assert_eq!(json["first_name"], "Dora");

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.bio.is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_rejects_delete_with_405(pool: PgPool) {
    let (user, token) = create_user(&pool, "carol", Role::Admin).await;
    let app = common::build_test_app(pool.clone());

    let response = delete_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(UserRepo::find_by_id(&pool, user.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_rejects_delete_before_authentication(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = delete(app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unrouted_verb_is_405(pool: PgPool) {
    let (_user, token) = create_user(&pool, "dora", Role::User).await;
    let app = common::build_test_app(pool);
    let response = put_json_auth(app, "/api/v1/users/me", json!({"bio": "x"}), &token).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_rejects_taken_email(pool: PgPool) {
    create_user(&pool, "owner", Role::User).await;
    let (_user, token) = create_user(&pool, "erin", Role::User).await;
    let app = common::build_test_app(pool);

    let response = patch_json_auth(
        app,
        "/api/v1/users/me",
        json!({"email": "owner@example.com"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Administration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_cannot_read_accounts(pool: PgPool) {
    let (_user, token) = create_user(&pool, "frank", Role::Moderator).await;

    let app = common::build_test_app(pool.clone());
    let own = get_auth(app, "/api/v1/users/frank", &token).await;
    assert_eq!(own.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let list = get_auth(app, "/api/v1/users", &token).await;
    assert_eq!(list.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let anonymous = get(app, "/api/v1/users").await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_lists_and_searches_accounts(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "root", Role::Admin).await;
    create_user(&pool, "alice", Role::User).await;
    create_user(&pool, "malice", Role::User).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 3);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users?search=ALIC&limit=1", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
    assert_eq!(json["results"][0]["username"], "alice");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_creates_account_with_role(pool: PgPool) {
    let (_admin, token) = create_superuser(&pool, "root").await;
    let mailer = common::RecordingMailer::default();
    let app = common::build_test_app_with_mailer(pool.clone(), mailer.clone());

    let response = post_json_auth(
        app,
        "/api/v1/users",
        json!({
            "username": "mod",
            "email": "mod@example.com",
            "first_name": "Mo",
            "role": "moderator"
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["role"], "moderator");
    assert_eq!(json["first_name"], "Mo");
    assert_eq!(json["last_name"], "");
    assert!(mailer.sent().is_empty());

    let stored = UserRepo::find_by_username(&pool, "mod").await.unwrap().unwrap();
    assert_eq!(stored.confirmation_code.len(), 32);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_changes_another_users_role(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "root", Role::Admin).await;
    let (target, _) = create_user(&pool, "gina", Role::User).await;
    let app = common::build_test_app(pool.clone());

    let response = patch_json_auth(
        app,
        "/api/v1/users/gina",
        json!({"role": "moderator"}),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let stored = UserRepo::find_by_id(&pool, target.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Moderator);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_rename_to_me_is_rejected(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "root", Role::Admin).await;
    create_user(&pool, "hank", Role::User).await;
    let app = common::build_test_app(pool);

    let response = patch_json_auth(app, "/api/v1/users/hank", json!({"username": "me"}), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_deletes_account(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "root", Role::Admin).await;
    let (target, _) = create_user(&pool, "ivan", Role::User).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/api/v1/users/ivan", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(UserRepo::find_by_id(&pool, target.id).await.unwrap().is_none());

    let app = common::build_test_app(pool);
    let again = delete_auth(app, "/api/v1/users/ivan", &token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn superuser_flag_grants_admin_access(pool: PgPool) {
    let (_root, token) = create_superuser(&pool, "root").await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn role_changes_apply_to_existing_tokens(pool: PgPool) {
    let (user, token) = create_user(&pool, "judy", Role::Admin).await;
    let demote = yamdb_db::models::user::UpdateUser {
        role: Some(Role::User),
        ..Default::default()
    };
    UserRepo::update(&pool, user.id, &demote).await.unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
