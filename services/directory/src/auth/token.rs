//! Token login/logout handlers and the bearer guard.
//!
//! # Purpose
//! Tokens are opaque strings minted by the store on a successful login and
//! resolved back to a user on every protected request. No token structure is
//! exposed or validated beyond store lookup.
use crate::api::error::{ApiError, api_internal, api_unauthorized};
use crate::api::types::{LoginRequest, LoginResponse};
use crate::app::AppState;
use crate::model::{User, UserView};
use crate::store::StoreError;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the request's bearer token to its user, or fail with 401.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or_else(|| api_unauthorized("missing bearer token"))?;
    match state.store.user_for_token(token).await {
        Ok(user) => Ok(user),
        Err(StoreError::NotFound(_)) => Err(api_unauthorized("invalid or expired token")),
        Err(err) => Err(api_internal("token lookup failed", &err)),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/token",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    match state.store.login(&body.username, &body.password).await {
        Ok((token, user)) => {
            metrics::counter!("keel_directory_logins_total").increment(1);
            Ok(Json(LoginResponse {
                token,
                user: user.view(),
            }))
        }
        Err(StoreError::InvalidCredentials) => Err(api_unauthorized("invalid credentials")),
        Err(err) => Err(api_internal("login failed", &err)),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Missing token", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| api_unauthorized("missing bearer token"))?;
    match state.store.revoke_token(token).await {
        // Revoking an unknown token is a no-op success: the caller's goal
        // (token no longer valid) already holds.
        Ok(()) | Err(StoreError::NotFound(_)) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(api_internal("logout failed", &err)),
    }
}

#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserView),
        (status = 401, description = "Unauthorized", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserView>, ApiError> {
    let user = require_user(&state, &headers).await?;
    Ok(Json(user.view()))
}
