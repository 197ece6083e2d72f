mod common;

use axum::http::StatusCode;
use common::read_json;
use http_helpers::{authed_json_request, authed_request, json_request};
use keel_authz::Role;
use keel_directory::app::{AppState, build_router};
use keel_directory::auth::password::hash_password;
use keel_directory::model::NewUserRecord;
use keel_directory::store::DirectoryStore;
use keel_directory::store::memory::InMemoryStore;
use std::sync::Arc;
use tower::ServiceExt;

async fn app_with_admin() -> (axum::routing::RouterIntoService<axum::body::Body, ()>, String) {
    let store = InMemoryStore::new();
    store
        .create_user(NewUserRecord {
            username: "root".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: "root@example.com".to_string(),
            role: Role::Admin,
            is_active: true,
            password: hash_password("Str0ng!pass"),
        })
        .await
        .expect("seed admin");
    let state = AppState {
        api_version: "v1".to_string(),
        store: Arc::new(store),
    };
    let app = build_router(state).into_service();

    let login = json_request(
        "POST",
        "/v1/auth/token",
        serde_json::json!({ "username": "root", "password": "Str0ng!pass" }),
    );
    let response = app.clone().oneshot(login).await.expect("login");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    let token = payload["token"].as_str().expect("token").to_string();
    (app, token)
}

async fn create_user(
    app: &axum::routing::RouterIntoService<axum::body::Body, ()>,
    token: &str,
    username: &str,
    role: &str,
) -> u64 {
    let create = authed_json_request(
        "POST",
        "/v1/users",
        token,
        serde_json::json!({
            "username": username,
            "name": username,
            "email": format!("{username}@example.com"),
            "role": role,
            "status": "Active",
            "password": "Str0ng!pass"
        }),
    );
    let response = app.clone().oneshot(create).await.expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["id"].as_u64().expect("id")
}

#[tokio::test]
async fn create_validation_reports_per_field_messages() {
    let (app, token) = app_with_admin().await;

    let bad = authed_json_request(
        "POST",
        "/v1/users",
        &token,
        serde_json::json!({
            "username": "",
            "name": "  ",
            "email": "not-an-email",
            "role": "viewer",
            "status": "Active",
            "password": "weak"
        }),
    );
    let response = app.clone().oneshot(bad).await.expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "validation_error");
    assert_eq!(payload["fields"]["username"], "Required");
    assert_eq!(payload["fields"]["name"], "Required");
    assert_eq!(payload["fields"]["email"], "Invalid email");
    assert!(
        payload["fields"]["password"]
            .as_str()
            .expect("password message")
            .contains("any 3 of 4")
    );
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let (app, token) = app_with_admin().await;
    create_user(&app, &token, "mira", "viewer").await;

    let duplicate = authed_json_request(
        "POST",
        "/v1/users",
        &token,
        serde_json::json!({
            "username": "MIRA",
            "name": "Shadow",
            "email": "shadow@example.com",
            "role": "viewer",
            "status": "Active",
            "password": "Str0ng!pass"
        }),
    );
    let response = app.clone().oneshot(duplicate).await.expect("duplicate");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "already_exists");
}

#[tokio::test]
async fn last_admin_cannot_be_deleted_or_demoted() {
    let (app, token) = app_with_admin().await;
    create_user(&app, &token, "mira", "viewer").await;

    // root (id 1) is the only admin.
    let delete = authed_request("DELETE", "/v1/users/1", &token);
    let response = app.clone().oneshot(delete).await.expect("delete");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "last_admin");

    let demote = authed_json_request(
        "PATCH",
        "/v1/users/1",
        &token,
        serde_json::json!({ "role": "viewer" }),
    );
    let response = app.clone().oneshot(demote).await.expect("demote");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "last_admin");

    // A second admin lifts the protection.
    let backup = create_user(&app, &token, "backup", "admin").await;
    let demote_backup = authed_json_request(
        "PATCH",
        &format!("/v1/users/{backup}"),
        &token,
        serde_json::json!({ "role": "reviewer" }),
    );
    let response = app.clone().oneshot(demote_backup).await.expect("demote ok");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["role"], "reviewer");
}

#[tokio::test]
async fn admin_demotion_keeps_other_roles_editable() {
    let (app, token) = app_with_admin().await;
    let id = create_user(&app, &token, "mira", "creator").await;

    let update = authed_json_request(
        "PATCH",
        &format!("/v1/users/{id}"),
        &token,
        serde_json::json!({ "role": "reviewer", "email": "mira@new.example.com" }),
    );
    let response = app.clone().oneshot(update).await.expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["role"], "reviewer");
    assert_eq!(payload["email"], "mira@new.example.com");
}

#[tokio::test]
async fn update_validates_present_fields_only() {
    let (app, token) = app_with_admin().await;
    let id = create_user(&app, &token, "mira", "viewer").await;

    let bad_email = authed_json_request(
        "PATCH",
        &format!("/v1/users/{id}"),
        &token,
        serde_json::json!({ "email": "broken" }),
    );
    let response = app.clone().oneshot(bad_email).await.expect("bad email");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["fields"]["email"], "Invalid email");

    // Omitting the field entirely is fine.
    let rename = authed_json_request(
        "PATCH",
        &format!("/v1/users/{id}"),
        &token,
        serde_json::json!({ "name": "Mira Vance" }),
    );
    let response = app.clone().oneshot(rename).await.expect("rename");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["name"], "Mira Vance");
}

#[tokio::test]
async fn update_rejects_username_collision() {
    let (app, token) = app_with_admin().await;
    create_user(&app, &token, "mira", "viewer").await;
    let other = create_user(&app, &token, "bjorn", "viewer").await;

    let collide = authed_json_request(
        "PATCH",
        &format!("/v1/users/{other}"),
        &token,
        serde_json::json!({ "username": "mira" }),
    );
    let response = app.clone().oneshot(collide).await.expect("collide");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn temp_password_flow_updates_audit_fields() {
    let (app, token) = app_with_admin().await;
    let id = create_user(&app, &token, "mira", "viewer").await;

    let weak = authed_json_request(
        "POST",
        &format!("/v1/users/{id}/temp-password"),
        &token,
        serde_json::json!({ "password": "weak", "expiresInMins": 1440, "mustChange": true }),
    );
    let response = app.clone().oneshot(weak).await.expect("weak");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let set = authed_json_request(
        "POST",
        &format!("/v1/users/{id}/temp-password"),
        &token,
        serde_json::json!({ "password": "T3mp!pass", "expiresInMins": 1440, "mustChange": true }),
    );
    let response = app.clone().oneshot(set).await.expect("set");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert!(payload["tempPasswordLastSetAt"].is_string());
    assert_eq!(payload["mustChangePassword"], true);

    // The temporary password becomes the account's credential.
    let login = json_request(
        "POST",
        "/v1/auth/token",
        serde_json::json!({ "username": "mira", "password": "T3mp!pass" }),
    );
    let response = app.clone().oneshot(login).await.expect("temp login");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["user"]["mustChangePassword"], true);
}

#[tokio::test]
async fn password_reset_stamps_and_flags() {
    let (app, token) = app_with_admin().await;
    let id = create_user(&app, &token, "mira", "viewer").await;

    let reset = authed_request("POST", &format!("/v1/users/{id}/password-reset"), &token);
    let response = app.clone().oneshot(reset).await.expect("reset");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert!(payload["lastPasswordResetAt"].is_string());
    assert_eq!(payload["mustChangePassword"], true);

    let missing = authed_request("POST", "/v1/users/999/password-reset", &token);
    let response = app.clone().oneshot(missing).await.expect("missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
