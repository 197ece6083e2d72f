//! Directory HTTP application wiring.
//!
//! # Purpose
//! Builds the axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and
//! testable.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth;
use crate::store::DirectoryStore;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub store: Arc<dyn DirectoryStore>,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route("/v1/auth/token", axum::routing::post(auth::token::login))
        .route("/v1/auth/logout", axum::routing::post(auth::token::logout))
        .route("/v1/users/me", axum::routing::get(auth::token::me))
        .route(
            "/v1/users",
            axum::routing::get(api::users::list_users).post(api::users::create_user),
        )
        .route(
            "/v1/users/:id",
            axum::routing::patch(api::users::update_user).delete(api::users::delete_user),
        )
        .route(
            "/v1/users/:id/temp-password",
            axum::routing::post(api::users::set_temp_password),
        )
        .route(
            "/v1/users/:id/password-reset",
            axum::routing::post(api::users::password_reset),
        )
        .route(
            "/v1/permissions/:role",
            axum::routing::get(api::permissions::get_policy).put(api::permissions::put_policy),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
