//! Permission persistence handlers.
//!
//! # Purpose
//! Stores one policy grid per role. Incoming grids are normalized through the
//! dependency rules before they are kept, so a hand-crafted payload cannot
//! persist a grid the matrix editor could never produce.
use crate::api::error::{ApiError, api_internal, api_not_found};
use crate::api::types::{PolicyResponse, SavePolicyRequest};
use crate::app::AppState;
use crate::auth::require_user;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use keel_authz::Role;
use std::str::FromStr;

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    Role::from_str(raw).map_err(|_| api_not_found("unknown role"))
}

#[utoipa::path(
    get,
    path = "/v1/permissions/{role}",
    tag = "permissions",
    params(("role" = String, Path, description = "Role name")),
    responses(
        (status = 200, description = "Saved or default policy for the role", body = PolicyResponse),
        (status = 404, description = "Unknown role", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_policy(
    State(state): State<AppState>,
    Path(role): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PolicyResponse>, ApiError> {
    require_user(&state, &headers).await?;
    let role = parse_role(&role)?;
    let policy = state
        .store
        .load_policy(role)
        .await
        .map_err(|err| api_internal("failed to load policy", &err))?;
    Ok(Json(PolicyResponse { role, policy }))
}

#[utoipa::path(
    put,
    path = "/v1/permissions/{role}",
    tag = "permissions",
    params(("role" = String, Path, description = "Role name")),
    request_body = SavePolicyRequest,
    responses(
        (status = 200, description = "Policy stored", body = PolicyResponse),
        (status = 404, description = "Unknown role", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn put_policy(
    State(state): State<AppState>,
    Path(role): Path<String>,
    headers: HeaderMap,
    Json(body): Json<SavePolicyRequest>,
) -> Result<Json<PolicyResponse>, ApiError> {
    require_user(&state, &headers).await?;
    let role = parse_role(&role)?;
    // Re-establish the dependency rule before the grid is kept.
    let normalized = body.policy.normalized();
    let policy = state
        .store
        .save_policy(role, normalized)
        .await
        .map_err(|err| api_internal("failed to save policy", &err))?;
    Ok(Json(PolicyResponse { role, policy }))
}
