//! System identity and health endpoints.
use crate::api::error::{ApiError, api_internal};
use crate::api::types::{HealthResponse, SystemInfoResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/v1/system/info",
    tag = "system",
    responses(
        (status = 200, description = "Service identity", body = SystemInfoResponse)
    )
)]
pub(crate) async fn system_info(State(state): State<AppState>) -> Json<SystemInfoResponse> {
    Json(SystemInfoResponse {
        service: "keel-directory".to_string(),
        api_version: state.api_version.clone(),
        backend: state.store.backend_name().to_string(),
        durable: state.store.is_durable(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 500, description = "Store unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    state
        .store
        .health_check()
        .await
        .map_err(|err| api_internal("store health check failed", &err))?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
