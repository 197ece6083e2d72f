//! API error types and helpers.
//!
//! # Purpose
//! Centralizes HTTP error response construction so every endpoint returns the
//! same `{ code, message, fields? }` shape, with status codes aligned to the
//! error category. Internal failures are logged server-side and returned as
//! generic messages.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::collections::BTreeMap;

/// Structured API error returned by handlers: an HTTP status coupled with the
/// JSON error body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn error_body(code: &str, message: &str) -> ErrorResponse {
    ErrorResponse {
        code: code.to_string(),
        message: message.to_string(),
        fields: None,
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        body: error_body("not_found", message),
    }
}

pub fn api_conflict(code: &str, message: &str) -> ApiError {
    // Caller provides a specific conflict code for precise client handling.
    ApiError {
        status: StatusCode::CONFLICT,
        body: error_body(code, message),
    }
}

pub fn api_unauthorized(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::UNAUTHORIZED,
        body: error_body("unauthorized", message),
    }
}

/// Build a 400 response carrying per-field validation messages.
pub fn api_validation(fields: BTreeMap<String, String>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "validation_error".to_string(),
            message: "one or more fields are invalid".to_string(),
            fields: Some(fields),
        },
    }
}

pub fn api_last_admin() -> ApiError {
    api_conflict("last_admin", "at least one admin account must remain")
}

/// Log the store error server-side; return a generic internal message.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "directory storage error");
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: error_body("internal", message),
    }
}

pub fn api_internal_message(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: error_body("internal", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_build_expected_codes() {
        let not_found = api_not_found("missing");
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.body.code, "not_found");

        let conflict = api_conflict("already_exists", "conflict");
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.body.code, "already_exists");

        let last_admin = api_last_admin();
        assert_eq!(last_admin.status, StatusCode::CONFLICT);
        assert_eq!(last_admin.body.code, "last_admin");

        let unauthorized = api_unauthorized("nope");
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unauthorized.body.code, "unauthorized");

        let internal = api_internal_message("oops");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.body.code, "internal");
    }

    #[test]
    fn validation_carries_field_map() {
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), "Invalid email".to_string());
        let err = api_validation(fields);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "validation_error");
        assert_eq!(
            err.body.fields.as_ref().and_then(|f| f.get("email")),
            Some(&"Invalid email".to_string())
        );
    }

    #[test]
    fn internal_logs_and_wraps_store_error() {
        let err = StoreError::Unexpected(anyhow::anyhow!("boom"));
        let api = api_internal("storage failed", &err);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body.message, "storage failed");
    }
}
