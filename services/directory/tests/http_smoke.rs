mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
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
            first_name: "Root".to_string(),
            last_name: "Admin".to_string(),
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

#[tokio::test]
async fn login_me_and_logout_flow() {
    let (app, token) = app_with_admin().await;

    let me = authed_request("GET", "/v1/users/me", &token);
    let response = app.clone().oneshot(me).await.expect("me");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["username"], "root");
    assert_eq!(payload["role"], "admin");
    assert_eq!(payload["name"], "Root Admin");
    assert!(payload["lastLogin"].is_string());

    let logout = authed_request("POST", "/v1/auth/logout", &token);
    let response = app.clone().oneshot(logout).await.expect("logout");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let me_again = authed_request("GET", "/v1/users/me", &token);
    let response = app.clone().oneshot(me_again).await.expect("me again");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (app, _token) = app_with_admin().await;

    let bad = json_request(
        "POST",
        "/v1/auth/token",
        serde_json::json!({ "username": "root", "password": "nope" }),
    );
    let response = app.clone().oneshot(bad).await.expect("bad login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "unauthorized");
}

#[tokio::test]
async fn users_endpoints_require_a_token() {
    let (app, _token) = app_with_admin().await;

    let list = Request::builder()
        .uri("/v1/users")
        .body(Body::empty())
        .expect("list");
    let response = app.clone().oneshot(list).await.expect("list");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let stale = authed_request("GET", "/v1/users", "not-a-token");
    let response = app.clone().oneshot(stale).await.expect("stale");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn users_crud_smoke() {
    let (app, token) = app_with_admin().await;

    let create = authed_json_request(
        "POST",
        "/v1/users",
        &token,
        serde_json::json!({
            "username": "mira",
            "name": "Mira Vance",
            "email": "mira@example.com",
            "role": "creator",
            "status": "Active",
            "password": "Str0ng!pass"
        }),
    );
    let response = app.clone().oneshot(create).await.expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert_eq!(created["username"], "mira");
    assert_eq!(created["name"], "Mira Vance");
    assert_eq!(created["status"], "Active");
    let id = created["id"].as_u64().expect("id");

    let list = authed_request("GET", "/v1/users", &token);
    let response = app.clone().oneshot(list).await.expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["items"].as_array().expect("items").len(), 2);

    let update = authed_json_request(
        "PATCH",
        &format!("/v1/users/{id}"),
        &token,
        serde_json::json!({ "name": "Mira V. Vance", "status": "Inactive" }),
    );
    let response = app.clone().oneshot(update).await.expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["name"], "Mira V. Vance");
    assert_eq!(updated["status"], "Inactive");

    let delete = authed_request("DELETE", &format!("/v1/users/{id}"), &token);
    let response = app.clone().oneshot(delete).await.expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let delete_again = authed_request("DELETE", &format!("/v1/users/{id}"), &token);
    let response = app.clone().oneshot(delete_again).await.expect("delete again");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn system_endpoints() {
    let (app, _token) = app_with_admin().await;

    let info = Request::builder()
        .uri("/v1/system/info")
        .body(Body::empty())
        .expect("info");
    let response = app.clone().oneshot(info).await.expect("info");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["service"], "keel-directory");
    assert_eq!(payload["api_version"], "v1");
    assert_eq!(payload["backend"], "memory");
    assert_eq!(payload["durable"], false);

    let health = Request::builder()
        .uri("/v1/system/health")
        .body(Body::empty())
        .expect("health");
    let response = app.clone().oneshot(health).await.expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "ok");
}
