//! User API handlers.
//!
//! # Purpose
//! Implements user CRUD plus the password maintenance endpoints, with
//! server-side validation and the last-admin protection enforced regardless
//! of what the client checked.
use crate::api::error::{
    ApiError, api_conflict, api_internal, api_last_admin, api_not_found, api_validation,
};
use crate::api::types::{
    CreateUserRequest, TempPasswordRequest, UpdateUserRequest, UserListResponse,
};
use crate::app::AppState;
use crate::auth::password::{hash_password, meets_policy};
use crate::auth::require_user;
use crate::model::{NewUserRecord, UserPatchRecord, UserStatus, UserView};
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::collections::BTreeMap;

/// Loose email shape check: something before the `@`, a dotted domain after
/// it, no whitespace anywhere.
fn email_ok(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

/// Split a submitted full name into stored parts: first token, then the rest.
fn split_name(name: &str) -> (String, String) {
    let mut parts = name.trim().split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}

fn validate_create(body: &CreateUserRequest) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    if body.username.trim().is_empty() {
        fields.insert("username".to_string(), "Required".to_string());
    }
    if body.name.trim().is_empty() {
        fields.insert("name".to_string(), "Required".to_string());
    }
    if body.email.trim().is_empty() {
        fields.insert("email".to_string(), "Required".to_string());
    } else if !email_ok(&body.email) {
        fields.insert("email".to_string(), "Invalid email".to_string());
    }
    if body.password.trim().is_empty() {
        fields.insert("password".to_string(), "Required".to_string());
    } else if !meets_policy(&body.password) {
        fields.insert(
            "password".to_string(),
            "Use upper, lower, number, symbol (any 3 of 4)".to_string(),
        );
    }
    fields
}

fn validate_update(body: &UpdateUserRequest) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    if let Some(username) = &body.username {
        if username.trim().is_empty() {
            fields.insert("username".to_string(), "Required".to_string());
        }
    }
    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            fields.insert("name".to_string(), "Required".to_string());
        }
    }
    if let Some(email) = &body.email {
        if email.trim().is_empty() {
            fields.insert("email".to_string(), "Required".to_string());
        } else if !email_ok(email) {
            fields.insert("email".to_string(), "Invalid email".to_string());
        }
    }
    fields
}

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "List users", body = UserListResponse)
    )
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserListResponse>, ApiError> {
    require_user(&state, &headers).await?;
    let users = state
        .store
        .list_users()
        .await
        .map_err(|err| api_internal("failed to list users", &err))?;
    Ok(Json(UserListResponse {
        items: users.iter().map(|user| user.view()).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserView),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Username already exists", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_user(&state, &headers).await?;
    let fields = validate_create(&body);
    if !fields.is_empty() {
        return Err(api_validation(fields));
    }
    let (first_name, last_name) = split_name(&body.name);
    let record = NewUserRecord {
        username: body.username.trim().to_string(),
        first_name,
        last_name,
        email: body.email.trim().to_string(),
        role: body.role,
        is_active: body.status == UserStatus::Active,
        password: hash_password(body.password.trim()),
    };
    match state.store.create_user(record).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user.view()))),
        Err(StoreError::Conflict(_)) => {
            Err(api_conflict("already_exists", "username already exists"))
        }
        Err(err) => Err(api_internal("failed to create user", &err)),
    }
}

#[utoipa::path(
    patch,
    path = "/v1/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserView),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Conflict or last admin", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    require_user(&state, &headers).await?;
    let fields = validate_update(&body);
    if !fields.is_empty() {
        return Err(api_validation(fields));
    }
    let (first_name, last_name) = match &body.name {
        Some(name) => {
            let (first, last) = split_name(name);
            (Some(first), Some(last))
        }
        None => (None, None),
    };
    let patch = UserPatchRecord {
        username: body.username.map(|value| value.trim().to_string()),
        first_name,
        last_name,
        email: body.email.map(|value| value.trim().to_string()),
        role: body.role,
        is_active: body.status.map(|status| status == UserStatus::Active),
    };
    match state.store.update_user(id, patch).await {
        Ok(user) => Ok(Json(user.view())),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(StoreError::LastAdmin) => Err(api_last_admin()),
        Err(StoreError::Conflict(_)) => {
            Err(api_conflict("already_exists", "username already exists"))
        }
        Err(err) => Err(api_internal("failed to update user", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Last admin", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_user(&state, &headers).await?;
    match state.store.delete_user(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(StoreError::LastAdmin) => Err(api_last_admin()),
        Err(err) => Err(api_internal("failed to delete user", &err)),
    }
}

#[utoipa::path(
    post,
    path = "/v1/users/{id}/temp-password",
    tag = "users",
    params(("id" = u64, Path, description = "User identifier")),
    request_body = TempPasswordRequest,
    responses(
        (status = 200, description = "Temporary password set", body = UserView),
        (status = 400, description = "Password rejected", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn set_temp_password(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<TempPasswordRequest>,
) -> Result<Json<UserView>, ApiError> {
    require_user(&state, &headers).await?;
    if !meets_policy(&body.password) {
        let mut fields = BTreeMap::new();
        fields.insert(
            "password".to_string(),
            "Use upper, lower, number, symbol (any 3 of 4)".to_string(),
        );
        return Err(api_validation(fields));
    }
    let hash = hash_password(body.password.trim());
    match state
        .store
        .set_temp_password(id, hash, body.must_change)
        .await
    {
        Ok(user) => Ok(Json(user.view())),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(err) => Err(api_internal("failed to set temporary password", &err)),
    }
}

#[utoipa::path(
    post,
    path = "/v1/users/{id}/password-reset",
    tag = "users",
    params(("id" = u64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Reset recorded", body = UserView),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn password_reset(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<UserView>, ApiError> {
    require_user(&state, &headers).await?;
    match state.store.mark_password_reset(id).await {
        Ok(user) => Ok(Json(user.view())),
        Err(StoreError::NotFound(_)) => Err(api_not_found("user not found")),
        Err(err) => Err(api_internal("failed to record password reset", &err)),
    }
}
